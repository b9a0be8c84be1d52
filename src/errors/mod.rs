//! Error handling module for the dashboard.
//!
//! Provides a single error type for backend calls, view lookups and session
//! actions, with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const STALE_VIEW: &str = "STALE_VIEW";
    pub const NOT_LOADED: &str = "NOT_LOADED";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
///
/// `Clone` because a failed read is stored inside its placeholder and handed
/// to every reader that waits on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// The backend could not be reached
    Transport(String),
    /// The backend answered with a non-2xx status
    Upstream { status: u16, url: String },
    /// The backend body did not have the expected shape
    Decode(String),
    /// A detail item or view was not found
    NotFound(String),
    /// Malformed action or path template input
    BadRequest(String),
    /// The action targets a view that has since been replaced.
    ///
    /// `committed` is set when the action itself reached the backend before
    /// the view was replaced; only its result page was dropped, so the
    /// action must not be repeated.
    StaleView {
        expected: u64,
        active: u64,
        committed: bool,
    },
    /// The record an edit starts from has not been read successfully
    NotLoaded(String),
    /// Invalid configuration value
    Config(String),
    /// Internal error
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Transport(_) => StatusCode::BAD_GATEWAY,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Decode(_) => StatusCode::BAD_GATEWAY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::StaleView { .. } => StatusCode::CONFLICT,
            AppError::NotLoaded(_) => StatusCode::CONFLICT,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Transport(_) => codes::TRANSPORT_ERROR,
            AppError::Upstream { .. } => codes::UPSTREAM_ERROR,
            AppError::Decode(_) => codes::DECODE_ERROR,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
            AppError::StaleView { .. } => codes::STALE_VIEW,
            AppError::NotLoaded(_) => codes::NOT_LOADED,
            AppError::Config(_) => codes::CONFIG_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Transport(msg) => msg.clone(),
            AppError::Upstream { status, url } => {
                format!("Backend returned {} for {}", status, url)
            }
            AppError::Decode(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::StaleView {
                expected,
                active,
                committed: false,
            } => format!(
                "View generation {} is no longer active (active: {})",
                expected, active
            ),
            AppError::StaleView {
                expected, active, ..
            } => format!(
                "View generation {} was replaced (active: {}) after the action was applied",
                expected, active
            ),
            AppError::NotLoaded(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        tracing::warn!("Backend request error: {:?}", err);
        if err.is_decode() {
            AppError::Decode(format!("Decode error: {}", err))
        } else {
            AppError::Transport(format!("Transport error: {}", err))
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::warn!("JSON error: {:?}", err);
        AppError::Decode(format!("JSON error: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        tracing::error!("URL error: {:?}", err);
        AppError::BadRequest(format!("URL error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
    pub generation: u64,
}

impl ErrorResponse {
    pub fn new(error: &AppError, generation: u64) -> Self {
        let details = match error {
            AppError::Upstream { status, url } => {
                Some(serde_json::json!({ "status": status, "url": url }))
            }
            AppError::StaleView {
                expected,
                active,
                committed,
            } => Some(serde_json::json!({
                "expected": expected,
                "active": active,
                "committed": committed,
            })),
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
            generation,
        }
    }
}

/// Wrapper type for errors that carry the view generation they were raised in.
pub struct AppErrorWithGeneration {
    pub error: AppError,
    pub generation: u64,
}

impl IntoResponse for AppErrorWithGeneration {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.generation);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_view_maps_to_conflict() {
        let err = AppError::StaleView {
            expected: 1,
            active: 2,
            committed: false,
        };
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), codes::STALE_VIEW);

        let body = ErrorResponse::new(&err, 2);
        assert!(!body.success);
        let details = body.error.details.unwrap();
        assert_eq!(details["expected"], 1);
        assert_eq!(details["committed"], false);
    }

    #[test]
    fn test_committed_stale_view_says_so() {
        let err = AppError::StaleView {
            expected: 3,
            active: 4,
            committed: true,
        };
        assert!(err.message().contains("after the action was applied"));

        let body = ErrorResponse::new(&err, 4);
        assert_eq!(body.error.details.unwrap()["committed"], true);
    }

    #[test]
    fn test_not_loaded_is_a_conflict() {
        let err = AppError::NotLoaded("Settings for acme/api are not loaded".to_string());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), codes::NOT_LOADED);
    }

    #[test]
    fn test_upstream_message_names_url() {
        let err = AppError::Upstream {
            status: 503,
            url: "/api/builds".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("/api/builds"));
    }
}
