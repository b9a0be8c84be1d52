//! Resource declarations and path template expansion.

use std::collections::{BTreeMap, BTreeSet};

use url::{Position, Url};

use crate::errors::AppError;

/// Parameters for a resource call. Keys not consumed by the path template
/// become query-string pairs, in key order.
pub type Params = BTreeMap<String, String>;

/// Build a parameter map from literal pairs.
pub fn params<const N: usize>(pairs: [(&str, &str); N]) -> Params {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// A REST resource the dashboard reads or mutates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Cache namespace for this resource
    pub kind: &'static str,
    /// Path template with `:name` placeholders
    pub path: &'static str,
    /// Whether successful reads are kept in the response cache
    pub cached: bool,
}

/// A fully expanded request target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: Url,
    /// Path and query, used as the cache key
    pub key: String,
}

impl Resource {
    pub const fn new(kind: &'static str, path: &'static str) -> Self {
        Self {
            kind,
            path,
            cached: false,
        }
    }

    pub const fn cached(kind: &'static str, path: &'static str) -> Self {
        Self {
            kind,
            path,
            cached: true,
        }
    }

    /// Expand the path template against `base`.
    pub fn resolve(&self, base: &Url, params: &Params) -> Result<ResolvedUrl, AppError> {
        let mut consumed = BTreeSet::new();
        let mut segments = Vec::new();

        for segment in self.path.split('/').filter(|s| !s.is_empty()) {
            match segment.strip_prefix(':') {
                Some(name) => {
                    let value = params
                        .get(name)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| {
                            AppError::BadRequest(format!(
                                "Missing parameter '{}' for {}",
                                name, self.path
                            ))
                        })?;
                    consumed.insert(name);
                    segments.push(value.as_str());
                }
                None => segments.push(segment),
            }
        }

        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| AppError::Config(format!("Base URL {} cannot carry a path", base)))?
            .pop_if_empty()
            .extend(segments);

        let mut query = params
            .iter()
            .filter(|(k, _)| !consumed.contains(k.as_str()))
            .peekable();
        if query.peek().is_some() {
            url.query_pairs_mut().extend_pairs(query);
        }

        let key = url[Position::BeforePath..].to_string();
        Ok(ResolvedUrl { url, key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUILD_LOGS: Resource = Resource::new(
        "buildLogs",
        "/api/organizations/:orgId/repositories/:repoId/builds/:buildId/logs",
    );
    const TRIGGERS: Resource = Resource::cached("triggers", "/api/triggers");

    fn base() -> Url {
        Url::parse("http://backend:8080/").unwrap()
    }

    #[test]
    fn test_expand_placeholders() {
        let target = BUILD_LOGS
            .resolve(
                &base(),
                &params([("orgId", "42"), ("repoId", "7"), ("buildId", "99")]),
            )
            .unwrap();
        assert_eq!(
            target.key,
            "/api/organizations/42/repositories/7/builds/99/logs"
        );
        assert_eq!(
            target.url.as_str(),
            "http://backend:8080/api/organizations/42/repositories/7/builds/99/logs"
        );
    }

    #[test]
    fn test_leftover_params_become_sorted_query() {
        let target = TRIGGERS
            .resolve(&base(), &params([("repository", "2"), ("organization", "1")]))
            .unwrap();
        assert_eq!(target.key, "/api/triggers?organization=1&repository=2");
    }

    #[test]
    fn test_values_are_encoded() {
        let target = BUILD_LOGS
            .resolve(
                &base(),
                &params([("orgId", "my org"), ("repoId", "a/b"), ("buildId", "1")]),
            )
            .unwrap();
        assert_eq!(
            target.key,
            "/api/organizations/my%20org/repositories/a%2Fb/builds/1/logs"
        );
    }

    #[test]
    fn test_missing_placeholder_is_rejected() {
        let err = BUILD_LOGS
            .resolve(&base(), &params([("orgId", "42")]))
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_base_path_prefix_is_kept() {
        let base = Url::parse("http://backend/gocilla/").unwrap();
        let target = TRIGGERS.resolve(&base, &Params::new()).unwrap();
        assert_eq!(target.url.as_str(), "http://backend/gocilla/api/triggers");
    }
}
