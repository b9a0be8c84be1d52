//! Repository settings model.

use serde::{Deserialize, Serialize};

use super::EnvVar;

/// Settings stored by the backend for one repository.
///
/// `env_vars` stays `None` until the first variable is added; the backend
/// sends `null` for repositories that never had settings saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    #[serde(default)]
    pub org_id: String,
    #[serde(default)]
    pub repo_id: String,
    #[serde(default)]
    pub env_vars: Option<Vec<EnvVar>>,
}

impl Repository {
    /// Blank settings for a repository the backend has nothing stored for.
    pub fn blank(org_id: &str, repo_id: &str) -> Self {
        Self {
            org_id: org_id.to_string(),
            repo_id: repo_id.to_string(),
            env_vars: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_env_vars_stay_absent() {
        let repo: Repository =
            serde_json::from_str(r#"{"orgId":"acme","repoId":"api","envVars":null}"#).unwrap();
        assert_eq!(repo, Repository::blank("acme", "api"));

        let json = serde_json::to_value(&repo).unwrap();
        assert_eq!(json["orgId"], "acme");
        assert!(json["envVars"].is_null());
    }
}
