//! Build model matching the backend build document.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a build or build task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BuildStatus {
    #[default]
    Pending,
    Running,
    Success,
    #[serde(alias = "failure")]
    Error,
    #[serde(other)]
    Unknown,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Pending => "pending",
            BuildStatus::Running => "running",
            BuildStatus::Success => "success",
            BuildStatus::Error => "error",
            BuildStatus::Unknown => "unknown",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, BuildStatus::Success | BuildStatus::Error)
    }
}

/// One pipeline step inside a build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct BuildTask {
    pub name: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub status: BuildStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
}

/// A build launched by the backend for a repository event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub id: String,
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub repository: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub pipeline: String,
    #[serde(default)]
    pub status: BuildStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub env_vars: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "crate::models::null_as_default")]
    pub tasks: Vec<BuildTask>,
}

impl Build {
    /// Time between start and end, once both are known.
    pub fn duration(&self) -> Option<Duration> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    pub fn duration_label(&self) -> Option<String> {
        self.duration().map(humanize)
    }

    /// Relative start label such as "3 minutes ago".
    pub fn started_label(&self, now: DateTime<Utc>) -> Option<String> {
        self.start.map(|start| format!("{} ago", humanize(now - start)))
    }
}

/// Find a build in a list by its id.
pub fn find_build<'a>(builds: &'a [Build], id: &str) -> Option<&'a Build> {
    builds.iter().find(|b| b.id == id)
}

/// Log output of one build, split into lines.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct BuildLog {
    pub lines: Vec<String>,
}

impl BuildLog {
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(str::to_string).collect(),
        }
    }
}

/// Coarse human wording of a duration, sign ignored.
pub fn humanize(duration: Duration) -> String {
    let seconds = duration.num_seconds().abs();
    let minutes = (seconds as f64 / 60.0).round() as i64;
    let hours = (seconds as f64 / 3600.0).round() as i64;
    let days = (seconds as f64 / 86400.0).round() as i64;

    match seconds {
        s if s < 45 => "a few seconds".to_string(),
        s if s < 90 => "a minute".to_string(),
        s if s < 45 * 60 => format!("{} minutes", minutes),
        s if s < 90 * 60 => "an hour".to_string(),
        s if s < 22 * 3600 => format!("{} hours", hours),
        s if s < 36 * 3600 => "a day".to_string(),
        s if s < 26 * 86400 => format!("{} days", days),
        s if s < 45 * 86400 => "a month".to_string(),
        s if s < 320 * 86400 => format!("{} months", (days as f64 / 30.0).round() as i64),
        s if s < 548 * 86400 => "a year".to_string(),
        _ => format!("{} years", (days as f64 / 365.0).round() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_backend_build() {
        let json = r#"{
            "id": "5a1b",
            "organization": "acme",
            "repository": "api",
            "event": "push",
            "branch": "master",
            "pipeline": "build",
            "status": "error",
            "error": "Error executing the pipeline",
            "start": "2016-05-04T10:00:00.123456789Z",
            "end": "2016-05-04T10:03:00.123456789Z",
            "envVars": null,
            "tasks": [{"name": "test", "command": "make test", "status": "success",
                       "start": "2016-05-04T10:00:01Z", "end": "2016-05-04T10:02:00Z"}]
        }"#;

        let build: Build = serde_json::from_str(json).unwrap();
        assert_eq!(build.status, BuildStatus::Error);
        assert!(build.env_vars.is_empty());
        assert_eq!(build.tasks[0].status, BuildStatus::Success);
        assert_eq!(build.duration(), Some(Duration::minutes(3)));
        assert_eq!(build.duration_label().as_deref(), Some("3 minutes"));
    }

    #[test]
    fn test_status_aliases() {
        let failure: BuildStatus = serde_json::from_str(r#""failure""#).unwrap();
        assert_eq!(failure, BuildStatus::Error);
        let odd: BuildStatus = serde_json::from_str(r#""queued""#).unwrap();
        assert_eq!(odd, BuildStatus::Unknown);
        assert!(!BuildStatus::Running.is_finished());
    }

    #[test]
    fn test_running_build_has_no_duration() {
        let build = Build {
            id: "1".to_string(),
            status: BuildStatus::Running,
            start: Some(Utc::now()),
            ..Default::default()
        };
        assert!(build.duration().is_none());
    }

    #[test]
    fn test_humanize_thresholds() {
        assert_eq!(humanize(Duration::seconds(10)), "a few seconds");
        assert_eq!(humanize(Duration::seconds(-60)), "a minute");
        assert_eq!(humanize(Duration::minutes(10)), "10 minutes");
        assert_eq!(humanize(Duration::minutes(60)), "an hour");
        assert_eq!(humanize(Duration::hours(5)), "5 hours");
        assert_eq!(humanize(Duration::hours(30)), "a day");
        assert_eq!(humanize(Duration::days(3)), "3 days");
        assert_eq!(humanize(Duration::days(400)), "a year");
    }

    #[test]
    fn test_log_lines() {
        let log = BuildLog::from_text("cloning\r\nbuilding\ndone\n");
        assert_eq!(log.lines, vec!["cloning", "building", "done"]);
        assert!(BuildLog::from_text("").lines.is_empty());
    }
}
