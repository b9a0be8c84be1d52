//! Resource client for the Gocilla backend API.
//!
//! Reads (`query`, `get`) hand back a [`Deferred`] placeholder right away and
//! fill it when the response arrives, going through the [`ResponseCache`] for
//! cached resource kinds. Mutations (`save`, `delete`) resolve to a bare
//! completion and invalidate the cache entries under their own URL.

mod cache;
mod deferred;
mod template;

pub use cache::*;
pub use deferred::*;
pub use template::*;

use std::time::Duration;

use reqwest::{Client as HttpClient, Method, Response};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::errors::AppError;

type Decoder<T> = fn(&Value) -> Result<T, serde_json::Error>;

fn decode_record<T: DeserializeOwned>(body: &Value) -> Result<T, serde_json::Error> {
    T::deserialize(body)
}

/// The backend sends `null` rather than `[]` for an empty collection.
fn decode_list<T: DeserializeOwned>(body: &Value) -> Result<Vec<T>, serde_json::Error> {
    Option::<Vec<T>>::deserialize(body).map(Option::unwrap_or_default)
}

/// HTTP client bound to one backend, owning the response cache.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    http_client: HttpClient,
    base_url: Url,
    cache: ResponseCache,
}

impl ResourceClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, AppError> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("gocilla-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            base_url,
            cache: ResponseCache::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Read a collection. A `null` body reads as an empty list.
    pub fn query<T>(&self, resource: &Resource, params: &Params) -> Deferred<Vec<T>>
    where
        T: DeserializeOwned + Clone + Send + Sync + 'static,
    {
        self.read(resource, params, decode_list::<T>)
    }

    /// Read a single record.
    pub fn get<T>(&self, resource: &Resource, params: &Params) -> Deferred<T>
    where
        T: DeserializeOwned + Clone + Default + Send + Sync + 'static,
    {
        self.read(resource, params, decode_record::<T>)
    }

    /// POST `body` to the resource and invalidate what it covers.
    pub async fn save<B: Serialize>(
        &self,
        resource: &Resource,
        params: &Params,
        body: &B,
    ) -> Result<(), AppError> {
        let target = resource.resolve(&self.base_url, params)?;
        let body = serde_json::to_value(body)?;
        self.send(Method::POST, &target, Some(&body)).await?;
        self.cache.invalidate(&target.key);
        Ok(())
    }

    /// DELETE the resource and invalidate what it covers.
    pub async fn delete(&self, resource: &Resource, params: &Params) -> Result<(), AppError> {
        let target = resource.resolve(&self.base_url, params)?;
        self.send(Method::DELETE, &target, None).await?;
        self.cache.invalidate(&target.key);
        Ok(())
    }

    /// Uncached plain-text read.
    pub async fn fetch_text(&self, resource: &Resource, params: &Params) -> Result<String, AppError> {
        let target = resource.resolve(&self.base_url, params)?;
        let response = self.send(Method::GET, &target, None).await?;
        Ok(response.text().await?)
    }

    /// Remove every cached response under `pattern`.
    pub fn invalidate(&self, pattern: &str) -> usize {
        self.cache.invalidate(pattern)
    }

    /// Key a resource would be cached under, for explicit invalidation.
    pub fn cache_key(&self, resource: &Resource, params: &Params) -> Result<String, AppError> {
        Ok(resource.resolve(&self.base_url, params)?.key)
    }

    fn read<T>(&self, resource: &Resource, params: &Params, decode: Decoder<T>) -> Deferred<T>
    where
        T: DeserializeOwned + Clone + Default + Send + Sync + 'static,
    {
        let target = match resource.resolve(&self.base_url, params) {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(kind = resource.kind, "Cannot resolve read: {}", e);
                return Deferred::failed(e);
            }
        };

        if resource.cached {
            if let Some(body) = self.cache.get(resource.kind, &target.key) {
                match decode(&*body) {
                    Ok(value) => {
                        tracing::debug!(kind = resource.kind, key = %target.key, "Cache hit");
                        return Deferred::ready(value);
                    }
                    Err(e) => {
                        tracing::warn!(key = %target.key, "Dropping undecodable cache entry: {}", e);
                        self.cache.remove(resource.kind, &target.key);
                    }
                }
            }
        }

        // Captured before the request leaves so a racing invalidation wins.
        let generation = self.cache.generation();
        let client = self.clone();
        let resource = *resource;

        Deferred::spawn(async move {
            let result = client.fetch_json(&resource, &target, generation, decode).await;
            if let Err(e) = &result {
                tracing::warn!(kind = resource.kind, key = %target.key, "Read failed: {}", e);
            }
            result
        })
    }

    async fn fetch_json<T>(
        &self,
        resource: &Resource,
        target: &ResolvedUrl,
        generation: u64,
        decode: Decoder<T>,
    ) -> Result<T, AppError> {
        let response = self.send(Method::GET, target, None).await?;
        let text = response.text().await?;
        let body: Value = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        let value = decode(&body)?;
        if resource.cached {
            self.cache.insert(resource.kind, &target.key, body, generation);
        }
        Ok(value)
    }

    async fn send(
        &self,
        method: Method,
        target: &ResolvedUrl,
        body: Option<&Value>,
    ) -> Result<Response, AppError> {
        tracing::debug!(method = method.as_str(), key = %target.key, "Backend request");

        let mut request = self.http_client.request(method, target.url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
                url: target.key.clone(),
            });
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_matches_resolved_path() {
        let client = ResourceClient::new(
            Url::parse("http://localhost:8080").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        let triggers = Resource::cached("triggers", "/api/triggers");
        let key = client
            .cache_key(&triggers, &params([("organization", "1"), ("repository", "2")]))
            .unwrap();
        assert_eq!(key, "/api/triggers?organization=1&repository=2");
    }

    #[tokio::test]
    async fn test_unresolvable_read_fails_but_stays_bindable() {
        let client = ResourceClient::new(
            Url::parse("http://localhost:8080").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();
        let repo = Resource::cached("repository", "/api/organizations/:orgId/repositories/:repoId");
        let deferred: Deferred<Vec<u32>> = client.query(&repo, &Params::new());
        assert!(deferred.is_resolved());
        assert!(deferred.value().is_empty());
        assert!(matches!(deferred.wait().await, Err(AppError::BadRequest(_))));
    }
}
