//! The browsing session: one active page at a time.
//!
//! Every navigation takes a new generation number. A navigation whose reads
//! finish after a newer one started is discarded, and actions aimed at a
//! generation that is no longer active are refused.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::Mutex;

use crate::client::{Deferred, ResourceClient};
use crate::controllers::{Action, ActionOutcome, Controller, ViewModel};
use crate::errors::AppError;
use crate::models::Profile;
use crate::routes::{RouteMatch, RouteTable};
use crate::services::profile;

/// Where the browser goes to sign in.
pub const LOGIN_PATH: &str = "/login";

/// A rendered page: the route it came from and its view-model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub generation: u64,
    #[serde(flatten)]
    pub route: RouteMatch,
    pub model: ViewModel,
}

/// Result of an action together with the page after it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResult {
    pub outcome: ActionOutcome,
    pub page: Page,
}

#[derive(Debug)]
struct ActiveView {
    generation: u64,
    route: RouteMatch,
    controller: Controller,
}

impl ActiveView {
    fn render(&self) -> Page {
        Page {
            generation: self.generation,
            route: self.route.clone(),
            model: self.controller.view_model(),
        }
    }
}

#[derive(Debug)]
pub struct Session {
    client: ResourceClient,
    routes: RouteTable,
    generation: AtomicU64,
    active: Mutex<Option<ActiveView>>,
}

impl Session {
    pub fn new(client: ResourceClient, routes: RouteTable) -> Self {
        Self {
            client,
            routes,
            generation: AtomicU64::new(0),
            active: Mutex::new(None),
        }
    }

    /// Latest generation handed out.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn resolve(&self, path: &str) -> RouteMatch {
        self.routes.resolve(path)
    }

    /// Open the page for `path` and make it the active one.
    pub async fn navigate(&self, path: &str) -> Result<Page, AppError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let route = self.routes.resolve(path);
        tracing::info!(path, view = ?route.view, generation, "Navigating");

        let mut controller = Controller::open(&self.client, &route)?;
        controller.settle().await;

        let mut active = self.active.lock().await;
        let latest = self.generation();
        if latest != generation {
            tracing::debug!(path, generation, latest, "Discarding superseded navigation");
            return Err(AppError::StaleView {
                expected: generation,
                active: latest,
                committed: false,
            });
        }

        let view = ActiveView {
            generation,
            route,
            controller,
        };
        let page = view.render();
        *active = Some(view);
        Ok(page)
    }

    pub async fn current(&self) -> Result<Page, AppError> {
        let active = self.active.lock().await;
        active
            .as_ref()
            .map(ActiveView::render)
            .ok_or_else(|| AppError::NotFound("No page is open".to_string()))
    }

    /// Run a user action on the active page.
    ///
    /// `expected` is the generation the caller saw; `None` targets whatever
    /// is active.
    pub async fn apply(&self, expected: Option<u64>, action: Action) -> Result<ActionResult, AppError> {
        let mut active = self.active.lock().await;
        let view = active
            .as_mut()
            .ok_or_else(|| AppError::NotFound("No page is open".to_string()))?;

        let latest = self.generation();
        let target = expected.unwrap_or(view.generation);
        if target != view.generation || view.generation != latest {
            return Err(AppError::StaleView {
                expected: target,
                active: latest,
                committed: false,
            });
        }

        tracing::debug!(generation = view.generation, ?action, "Applying action");
        let writes = action.writes_backend();
        let outcome = view.controller.apply(action).await;

        // A navigation may have started while the action ran; its page wins.
        let latest = self.generation();
        if latest != view.generation {
            let committed = writes && outcome.is_ok();
            tracing::warn!(
                generation = view.generation,
                latest,
                committed,
                "Page replaced while the action ran, dropping its result"
            );
            return Err(AppError::StaleView {
                expected: view.generation,
                active: latest,
                committed,
            });
        }

        let outcome = outcome?;
        view.controller.settle().await;
        Ok(ActionResult {
            outcome,
            page: view.render(),
        })
    }

    /// Profile for the navigation header; cached after the first read.
    pub fn profile(&self) -> Deferred<Profile> {
        profile::get(&self.client)
    }

    /// Sign out, forget cached data and the open page. Returns where the
    /// browser should go next.
    pub async fn logout(&self) -> Result<&'static str, AppError> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.active.lock().await.take();

        if let Err(e) = profile::logout(&self.client).await {
            tracing::error!("Logout failed: {}", e);
            return Err(e);
        }
        tracing::info!("Signed out");
        Ok("/")
    }
}
