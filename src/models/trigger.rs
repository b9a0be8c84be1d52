//! Trigger model: which pipeline runs for which repository event.

use serde::{Deserialize, Serialize};

use super::EnvVar;

/// Repository events a trigger can react to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TriggerEvent {
    #[default]
    Push,
    PullRequest,
}

/// A trigger registered on a repository.
///
/// `id` is assigned by the backend and absent on triggers not yet saved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Trigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub organization: String,
    pub repository: String,
    #[serde(default)]
    pub event: TriggerEvent,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub pipeline: String,
    #[serde(default)]
    pub env_vars: Option<Vec<EnvVar>>,
}

impl Trigger {
    /// Blank form for a new push trigger on the given repository.
    pub fn template(organization: &str, repository: &str) -> Self {
        Self {
            id: None,
            organization: organization.to_string(),
            repository: repository.to_string(),
            event: TriggerEvent::Push,
            branch: String::new(),
            pipeline: String::new(),
            env_vars: Some(Vec::new()),
        }
    }
}

/// Find a trigger in a list by its backend id.
pub fn find_trigger<'a>(triggers: &'a [Trigger], id: &str) -> Option<&'a Trigger> {
    triggers.iter().find(|t| t.id.as_deref() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_serializes_like_new_form() {
        let json = serde_json::to_value(Trigger::template("1", "2")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "organization": "1",
                "repository": "2",
                "event": "push",
                "branch": "",
                "pipeline": "",
                "envVars": []
            })
        );
    }

    #[test]
    fn test_find_by_id_not_position() {
        let triggers: Vec<Trigger> = serde_json::from_str(
            r#"[{"id":"b7","organization":"1","repository":"2","event":"pull_request","envVars":null},
                {"id":"0","organization":"1","repository":"2","event":"push"}]"#,
        )
        .unwrap();

        assert_eq!(triggers[0].event, TriggerEvent::PullRequest);
        assert_eq!(find_trigger(&triggers, "0").unwrap().event, TriggerEvent::Push);
        assert!(find_trigger(&triggers, "1").is_none());
    }
}
