//! Page endpoints.

use axum::{
    extract::State,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;

use super::{error, success, ApiResponse, ApiResult};
use crate::errors::AppErrorWithGeneration;
use crate::session::Page;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NavigateRequest {
    pub path: String,
}

/// GET /session/view - The active page.
pub async fn current_view(State(state): State<AppState>) -> ApiResult<Page> {
    let generation = state.session.generation();

    match state.session.current().await {
        Ok(page) => success(page, generation),
        Err(e) => error(e, generation),
    }
}

/// POST /session/navigate - Open a page by path.
pub async fn navigate(
    State(state): State<AppState>,
    Json(request): Json<NavigateRequest>,
) -> ApiResult<Page> {
    match state.session.navigate(&request.path).await {
        Ok(page) => {
            let generation = page.generation;
            success(page, generation)
        }
        Err(e) => error(e, state.session.generation()),
    }
}

/// GET <any other path> - Open the page the browser asked for.
///
/// Unknown paths are redirected to the default page instead of failing.
pub async fn render_page(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();

    if let Some(target) = state.session.resolve(path).redirect_to {
        tracing::debug!(path, target = %target, "Redirecting unknown path");
        return Redirect::to(&target).into_response();
    }

    match state.session.navigate(path).await {
        Ok(page) => {
            let generation = page.generation;
            ApiResponse::new(page, generation).into_response()
        }
        Err(e) => AppErrorWithGeneration {
            error: e,
            generation: state.session.generation(),
        }
        .into_response(),
    }
}
