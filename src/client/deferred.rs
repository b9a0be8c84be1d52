//! Placeholders for reads that have been issued but may not have arrived.

use std::future::Future;
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tokio::sync::watch;

use crate::errors::AppError;

/// Progress of a read.
#[derive(Debug, Clone)]
pub enum LoadState<T> {
    Pending,
    Ready(T),
    Failed(AppError),
}

/// A value that is bindable immediately and filled in place when its read
/// completes. Until then (and after a failure) it reads as `T::default()`.
///
/// Clones share the same slot.
#[derive(Debug)]
pub struct Deferred<T> {
    state: Arc<watch::Sender<LoadState<T>>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Deferred<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    /// Run `future` on the runtime and return the placeholder it will fill.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, AppError>> + Send + 'static,
    {
        let (tx, _) = watch::channel(LoadState::Pending);
        let state = Arc::new(tx);
        let slot = Arc::clone(&state);

        tokio::spawn(async move {
            let outcome = match future.await {
                Ok(value) => LoadState::Ready(value),
                Err(err) => LoadState::Failed(err),
            };
            if Arc::strong_count(&slot) == 1 {
                tracing::debug!("Discarding response for a view that is gone");
                return;
            }
            slot.send_replace(outcome);
        });

        Self { state }
    }

    /// An already-resolved placeholder, e.g. for a cache hit.
    pub fn ready(value: T) -> Self {
        let (tx, _) = watch::channel(LoadState::Ready(value));
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn failed(error: AppError) -> Self {
        let (tx, _) = watch::channel(LoadState::Failed(error));
        Self {
            state: Arc::new(tx),
        }
    }

    /// Current value, or the empty default while pending or failed.
    pub fn value(&self) -> T {
        match &*self.state.borrow() {
            LoadState::Ready(value) => value.clone(),
            _ => T::default(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(*self.state.borrow(), LoadState::Pending)
    }

    pub fn error(&self) -> Option<AppError> {
        match &*self.state.borrow() {
            LoadState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Wait for the read to finish.
    pub async fn wait(&self) -> Result<T, AppError> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|s| !matches!(s, LoadState::Pending))
            .await
            .map_err(|_| AppError::Internal("Read abandoned before completing".to_string()))?;

        match &*state {
            LoadState::Ready(value) => Ok(value.clone()),
            LoadState::Failed(err) => Err(err.clone()),
            LoadState::Pending => Err(AppError::Internal("Read still pending".to_string())),
        }
    }

    /// Wait for the read to finish, ignoring failures (already logged by
    /// the reader).
    pub async fn settle(&self) {
        let _ = self.wait().await;
    }

    /// Edit a resolved value in place. Returns false while pending or failed.
    pub fn modify(&self, edit: impl FnOnce(&mut T)) -> bool {
        self.state.send_if_modified(|state| match state {
            LoadState::Ready(value) => {
                edit(value);
                true
            }
            _ => false,
        })
    }
}

impl<T: Serialize + Default> Serialize for Deferred<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &*self.state.borrow() {
            LoadState::Ready(value) => value.serialize(serializer),
            _ => T::default().serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_pending_reads_as_empty_then_fills_in_place() {
        let (tx, rx) = oneshot::channel::<Vec<u32>>();
        let deferred = Deferred::spawn(async move {
            rx.await
                .map_err(|_| AppError::Internal("sender dropped".to_string()))
        });
        let bound = deferred.clone();

        assert!(!deferred.is_resolved());
        assert!(deferred.value().is_empty());
        assert_eq!(serde_json::to_value(&deferred).unwrap(), serde_json::json!([]));

        tx.send(vec![1, 2]).unwrap();
        assert_eq!(deferred.wait().await.unwrap(), vec![1, 2]);
        assert_eq!(bound.value(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failure_keeps_placeholder() {
        let deferred: Deferred<Vec<u32>> =
            Deferred::spawn(async { Err(AppError::Transport("refused".to_string())) });

        assert!(deferred.wait().await.is_err());
        assert!(deferred.is_resolved());
        assert!(deferred.value().is_empty());
        assert!(matches!(deferred.error(), Some(AppError::Transport(_))));
    }

    #[tokio::test]
    async fn test_modify_only_when_ready() {
        let ready = Deferred::ready(vec![1]);
        assert!(ready.modify(|v| v.push(2)));
        assert_eq!(ready.value(), vec![1, 2]);

        let failed: Deferred<Vec<u32>> = Deferred::failed(AppError::NotFound("x".to_string()));
        assert!(!failed.modify(|v| v.push(2)));
        assert!(failed.value().is_empty());
    }
}
