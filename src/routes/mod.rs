//! Route table: browser paths to views.
//!
//! Patterns are `/`-separated with `:name` parameter segments. The most
//! specific matching pattern wins; anything unmatched lands on the default
//! view with a redirect to `/`.

use std::collections::BTreeMap;

use serde::Serialize;

/// Pages the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    Organizations,
    Repository,
    RepositoryBuild,
    RepositorySettings,
    Triggers,
    Builds,
}

impl View {
    /// Template a front end renders the view-model with.
    pub fn template(&self) -> &'static str {
        match self {
            View::Organizations => "organization/organization.html",
            View::Repository | View::RepositoryBuild => "repository/repository.html",
            View::RepositorySettings => "repository/settings.html",
            View::Triggers => "triggers/triggers.html",
            View::Builds => "builds/builds.html",
        }
    }
}

/// Parameters bound from a matched path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RouteParams(BTreeMap<String, String>);

impl RouteParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn org_id(&self) -> Option<&str> {
        self.get("orgId")
    }

    pub fn repo_id(&self) -> Option<&str> {
        self.get("repoId")
    }

    pub fn build_id(&self) -> Option<&str> {
        self.get("buildId")
    }

    pub fn trigger_id(&self) -> Option<&str> {
        self.get("triggerId")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<const N: usize> From<[(&str, &str); N]> for RouteParams {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// One registered path pattern.
#[derive(Debug, Clone)]
pub struct Route {
    pattern: String,
    segments: Vec<Segment>,
    view: View,
}

impl Route {
    pub fn new(pattern: &str, view: View) -> Self {
        let segments = split(pattern)
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Static(s.to_string()),
            })
            .collect();
        Self {
            pattern: pattern.to_string(),
            segments,
            view,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn static_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Static(_)))
            .count()
    }

    fn bind(&self, parts: &[&str], case_insensitive: bool) -> Option<RouteParams> {
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(s) if case_insensitive && s.eq_ignore_ascii_case(part) => {}
                Segment::Static(s) if s == *part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(RouteParams(params))
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMatch {
    pub view: View,
    pub template: &'static str,
    pub pattern: String,
    pub path: String,
    pub params: RouteParams,
    /// Set when nothing matched and the browser should move to the default path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_to: Option<String>,
}

/// Registered routes plus the fallback view.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    default_route: Route,
    case_insensitive: bool,
}

impl RouteTable {
    pub fn new(default_route: Route) -> Self {
        Self {
            routes: Vec::new(),
            default_route,
            case_insensitive: false,
        }
    }

    pub fn when(mut self, pattern: &str, view: View) -> Self {
        self.routes.push(Route::new(pattern, view));
        self
    }

    pub fn case_insensitive(mut self, enabled: bool) -> Self {
        self.case_insensitive = enabled;
        self
    }

    /// The dashboard's pages.
    pub fn gocilla() -> Self {
        let repo = "/organizations/:orgId/repositories/:repoId";
        Self::new(Route::new("/", View::Organizations))
            .when("/", View::Organizations)
            .when("/builds", View::Builds)
            .when("/builds/:buildId", View::Builds)
            .when("/organizations", View::Organizations)
            .when("/organizations/:orgId", View::Organizations)
            .when(repo, View::Repository)
            .when(&format!("{}/builds/:buildId", repo), View::RepositoryBuild)
            .when(&format!("{}/hook", repo), View::Organizations)
            .when(&format!("{}/settings", repo), View::RepositorySettings)
            .when(&format!("{}/triggers", repo), View::Triggers)
            .when(&format!("{}/triggers/:triggerId", repo), View::Triggers)
    }

    pub fn resolve(&self, path: &str) -> RouteMatch {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let parts: Vec<&str> = split(path).collect();

        let best = self
            .routes
            .iter()
            .filter_map(|route| {
                route
                    .bind(&parts, self.case_insensitive)
                    .map(|params| (route, params))
            })
            .max_by_key(|(route, _)| (route.static_count(), route.pattern.len()));

        match best {
            Some((route, params)) => {
                tracing::debug!(path, pattern = %route.pattern, "Route matched");
                RouteMatch {
                    view: route.view,
                    template: route.view.template(),
                    pattern: route.pattern.clone(),
                    path: format!("/{}", parts.join("/")),
                    params,
                    redirect_to: None,
                }
            }
            None => {
                tracing::debug!(path, "No route matched, redirecting to default");
                let route = &self.default_route;
                RouteMatch {
                    view: route.view,
                    template: route.view.template(),
                    pattern: route.pattern.clone(),
                    path: route.pattern.clone(),
                    params: RouteParams::default(),
                    redirect_to: Some(route.pattern.clone()),
                }
            }
        }
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_build_route() {
        let matched = RouteTable::gocilla().resolve("/organizations/42/repositories/7/builds/99");
        assert_eq!(matched.view, View::RepositoryBuild);
        assert_eq!(
            matched.params,
            RouteParams::from([("orgId", "42"), ("repoId", "7"), ("buildId", "99")])
        );
        assert!(matched.redirect_to.is_none());
    }

    #[test]
    fn test_unknown_path_falls_back_to_root() {
        let matched = RouteTable::gocilla().resolve("/unknown/path");
        assert_eq!(matched.view, View::Organizations);
        assert!(matched.params.is_empty());
        assert_eq!(matched.redirect_to.as_deref(), Some("/"));
    }

    #[test]
    fn test_static_segment_beats_parameter() {
        let table = RouteTable::new(Route::new("/", View::Organizations))
            .when("/builds/:buildId", View::Builds)
            .when("/builds/latest", View::Organizations);
        assert_eq!(table.resolve("/builds/latest").view, View::Organizations);
        assert_eq!(table.resolve("/builds/12").view, View::Builds);
    }

    #[test]
    fn test_trailing_slash_and_query_ignored() {
        let matched = RouteTable::gocilla().resolve("/organizations/acme/?tab=all");
        assert_eq!(matched.view, View::Organizations);
        assert_eq!(matched.params.org_id(), Some("acme"));
        assert_eq!(matched.path, "/organizations/acme");
    }

    #[test]
    fn test_triggers_with_and_without_id() {
        let table = RouteTable::gocilla();
        let list = table.resolve("/organizations/1/repositories/2/triggers");
        assert_eq!(list.view, View::Triggers);
        assert_eq!(list.params.trigger_id(), None);

        let detail = table.resolve("/organizations/1/repositories/2/triggers/abc");
        assert_eq!(detail.params.trigger_id(), Some("abc"));
    }

    #[test]
    fn test_case_insensitive_option() {
        let path = "/Organizations/Acme/Repositories/API";
        assert!(RouteTable::gocilla().resolve(path).redirect_to.is_some());

        let matched = RouteTable::gocilla().case_insensitive(true).resolve(path);
        assert_eq!(matched.view, View::Repository);
        assert_eq!(matched.params.org_id(), Some("Acme"));
        assert_eq!(matched.params.repo_id(), Some("API"));
    }
}
