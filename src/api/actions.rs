//! Action endpoints: user callbacks into the active page.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error, success, ApiResult, GenerationQuery};
use crate::controllers::Action;
use crate::models::{EnvVar, Profile};
use crate::session::{ActionResult, LOGIN_PATH};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct HookRequest {
    #[serde(default)]
    pub organization: Option<String>,
    pub repository: String,
    pub hooked: bool,
}

/// Where the browser should go after a session change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectResponse {
    pub redirect_to: String,
}

async fn run(state: &AppState, query: GenerationQuery, action: Action) -> ApiResult<ActionResult> {
    match state.session.apply(query.generation, action).await {
        Ok(result) => {
            let generation = result.page.generation;
            success(result, generation)
        }
        Err(e) => error(e, state.session.generation()),
    }
}

/// POST /session/actions - Any action, tagged by `type`.
pub async fn apply_action(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    Json(action): Json<Action>,
) -> ApiResult<ActionResult> {
    run(&state, query, action).await
}

/// POST /session/actions/hook - Flip a repository's webhook switch.
pub async fn switch_hook(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    Json(request): Json<HookRequest>,
) -> ApiResult<ActionResult> {
    let action = Action::SwitchHook {
        organization: request.organization,
        repository: request.repository,
        hooked: request.hooked,
    };
    run(&state, query, action).await
}

/// POST /session/actions/env-vars - Append an env var to the form.
pub async fn add_env_var(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    Json(var): Json<EnvVar>,
) -> ApiResult<ActionResult> {
    run(&state, query, Action::AddEnvVar(var)).await
}

/// DELETE /session/actions/env-vars/{index} - Remove an env var from the form.
pub async fn delete_env_var(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
    Path(index): Path<usize>,
) -> ApiResult<ActionResult> {
    run(&state, query, Action::DeleteEnvVar { index }).await
}

/// POST /session/actions/submit - Persist the form.
pub async fn submit(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
) -> ApiResult<ActionResult> {
    run(&state, query, Action::Submit).await
}

/// POST /session/actions/cancel - Discard the form edits.
pub async fn cancel(
    State(state): State<AppState>,
    Query(query): Query<GenerationQuery>,
) -> ApiResult<ActionResult> {
    run(&state, query, Action::Cancel).await
}

/// GET /session/profile - Navigation header data.
pub async fn profile(State(state): State<AppState>) -> ApiResult<Profile> {
    let generation = state.session.generation();

    match state.session.profile().wait().await {
        Ok(profile) => {
            if !profile.is_signed_in() {
                tracing::debug!("No signed-in user");
            }
            success(profile, generation)
        }
        Err(e) => error(e, generation),
    }
}

/// POST /session/logout - End the backend session.
pub async fn logout(State(state): State<AppState>) -> ApiResult<RedirectResponse> {
    match state.session.logout().await {
        Ok(target) => success(
            RedirectResponse {
                redirect_to: target.to_string(),
            },
            state.session.generation(),
        ),
        Err(e) => error(e, state.session.generation()),
    }
}

/// GET /session/login - Where to send the browser to sign in.
pub async fn login(State(state): State<AppState>) -> ApiResult<RedirectResponse> {
    success(
        RedirectResponse {
            redirect_to: LOGIN_PATH.to_string(),
        },
        state.session.generation(),
    )
}
