//! HTTP surface of the view host.
//!
//! Pages are served as JSON documents a template layer binds to; actions
//! call back into the controller of the active page.

mod actions;
mod views;

pub use actions::*;
pub use views::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppErrorWithGeneration};

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub generation: u64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, generation: u64) -> Self {
        Self {
            success: true,
            data,
            generation,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithGeneration>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, generation: u64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, generation))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, generation: u64) -> ApiResult<T> {
    Err(AppErrorWithGeneration {
        error: err,
        generation,
    })
}

/// `?generation=N` on action requests.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationQuery {
    pub generation: Option<u64>,
}
