//! Organization model matching the backend organizations document.

use serde::{Deserialize, Serialize};

/// A repository as listed inside its organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RepositorySummary {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "gitURL", default, skip_serializing_if = "Option::is_none")]
    pub git_url: Option<String>,
    /// Whether the webhook that launches builds is installed
    #[serde(default)]
    pub hooked: bool,
}

/// An organization (or user account) owning repositories.
///
/// The login `name` doubles as the organization id in every route and API path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Organization {
    pub name: String,
    #[serde(rename = "avatarURL", default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub repositories: Vec<RepositorySummary>,
}

impl Organization {
    pub fn repository(&self, name: &str) -> Option<&RepositorySummary> {
        self.repositories.iter().find(|r| r.name == name)
    }

    pub fn repository_mut(&mut self, name: &str) -> Option<&mut RepositorySummary> {
        self.repositories.iter_mut().find(|r| r.name == name)
    }
}

/// Find a repository summary across a list of organizations.
pub fn find_repository_mut<'a>(
    organizations: &'a mut [Organization],
    org_id: &str,
    repo_id: &str,
) -> Option<&'a mut RepositorySummary> {
    organizations
        .iter_mut()
        .find(|o| o.name == org_id)
        .and_then(|o| o.repository_mut(repo_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_backend_document() {
        let json = r#"[{
            "name": "telefonica",
            "avatarURL": "https://avatars/1",
            "repositories": [
                {"name": "gocilla", "gitURL": "git://github.com/telefonica/gocilla.git", "hooked": true},
                {"name": "docs"}
            ]
        }, {"name": "empty", "repositories": null}]"#;

        let orgs: Vec<Organization> = serde_json::from_str(json).unwrap();
        assert_eq!(orgs.len(), 2);
        assert!(orgs[0].repository("gocilla").unwrap().hooked);
        assert!(!orgs[0].repository("docs").unwrap().hooked);
        assert!(orgs[1].repositories.is_empty());
    }

    #[test]
    fn test_find_repository_mut() {
        let mut orgs = vec![Organization {
            name: "acme".to_string(),
            avatar_url: None,
            repositories: vec![RepositorySummary {
                name: "api".to_string(),
                ..Default::default()
            }],
        }];

        find_repository_mut(&mut orgs, "acme", "api").unwrap().hooked = true;
        assert!(orgs[0].repositories[0].hooked);
        assert!(find_repository_mut(&mut orgs, "acme", "web").is_none());
        assert!(find_repository_mut(&mut orgs, "other", "api").is_none());
    }
}
