//! View controllers.
//!
//! Each controller is opened for one route visit, issues the reads its page
//! needs, exposes a serializable view-model and handles the user actions the
//! page offers.

mod builds;
mod organizations;
mod repository;
mod settings;
mod triggers;

pub use builds::*;
pub use organizations::*;
pub use repository::*;
pub use settings::*;
pub use triggers::*;

use serde::{Deserialize, Serialize};

use crate::client::ResourceClient;
use crate::errors::AppError;
use crate::models::EnvVar;
use crate::routes::{RouteMatch, View};

pub(crate) fn required<'a>(value: Option<&'a str>, name: &str) -> Result<&'a str, AppError> {
    value.ok_or_else(|| AppError::BadRequest(format!("Route parameter '{}' is required", name)))
}

/// User actions a page can call back with.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    SwitchHook {
        organization: Option<String>,
        repository: String,
        hooked: bool,
    },
    AddEnvVar(EnvVar),
    DeleteEnvVar {
        index: usize,
    },
    Submit,
    Cancel,
}

impl Action {
    /// Whether a successful run of this action changed backend state.
    pub fn writes_backend(&self) -> bool {
        matches!(self, Action::SwitchHook { .. } | Action::Submit)
    }

    fn name(&self) -> &'static str {
        match self {
            Action::SwitchHook { .. } => "hook switch",
            Action::AddEnvVar(_) | Action::DeleteEnvVar { .. } => "env vars",
            Action::Submit => "submit",
            Action::Cancel => "cancel",
        }
    }
}

/// What an action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ActionOutcome {
    Hook { change: HookChange },
    EnvVarAdded { index: usize },
    EnvVarRemoved { removed: EnvVar },
    Submitted,
    Cancelled,
}

/// The controller behind the active page.
#[derive(Debug)]
pub enum Controller {
    Organizations(OrganizationsController),
    Repository(RepositoryController),
    Settings(SettingsController),
    Triggers(TriggersController),
    Builds(BuildsController),
}

/// View-model of the active page.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ViewModel {
    Organizations(OrganizationsViewModel),
    Repository(RepositoryViewModel),
    Settings(SettingsViewModel),
    Triggers(TriggersViewModel),
    Builds(BuildsViewModel),
}

impl Controller {
    /// Open the controller for a resolved route. Reads start immediately.
    pub fn open(client: &ResourceClient, route: &RouteMatch) -> Result<Self, AppError> {
        let params = &route.params;
        Ok(match route.view {
            View::Organizations => {
                Controller::Organizations(OrganizationsController::open(client, params))
            }
            View::Repository | View::RepositoryBuild => {
                Controller::Repository(RepositoryController::open(client, params)?)
            }
            View::RepositorySettings => {
                Controller::Settings(SettingsController::open(client, params)?)
            }
            View::Triggers => Controller::Triggers(TriggersController::open(client, params)?),
            View::Builds => Controller::Builds(BuildsController::open(client, params)),
        })
    }

    /// Wait until every read issued so far has completed or failed.
    pub async fn settle(&mut self) {
        match self {
            Controller::Organizations(c) => c.settle().await,
            Controller::Repository(c) => c.settle().await,
            Controller::Settings(c) => c.settle().await,
            Controller::Triggers(c) => c.settle().await,
            Controller::Builds(c) => c.settle().await,
        }
    }

    pub fn view_model(&self) -> ViewModel {
        match self {
            Controller::Organizations(c) => ViewModel::Organizations(c.view_model()),
            Controller::Repository(c) => ViewModel::Repository(c.view_model()),
            Controller::Settings(c) => ViewModel::Settings(c.view_model()),
            Controller::Triggers(c) => ViewModel::Triggers(c.view_model()),
            Controller::Builds(c) => ViewModel::Builds(c.view_model()),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Controller::Organizations(_) => "organizations",
            Controller::Repository(_) => "repository",
            Controller::Settings(_) => "settings",
            Controller::Triggers(_) => "triggers",
            Controller::Builds(_) => "builds",
        }
    }

    pub async fn apply(&mut self, action: Action) -> Result<ActionOutcome, AppError> {
        match (self, action) {
            (
                Controller::Organizations(c),
                Action::SwitchHook {
                    organization,
                    repository,
                    hooked,
                },
            ) => c
                .switch_repo(organization.as_deref(), &repository, hooked)
                .await
                .map(|change| ActionOutcome::Hook { change }),

            (Controller::Settings(c), Action::AddEnvVar(var)) => c
                .add_env_var(var)
                .map(|index| ActionOutcome::EnvVarAdded { index }),
            (Controller::Triggers(c), Action::AddEnvVar(var)) => {
                Ok(ActionOutcome::EnvVarAdded {
                    index: c.add_env_var(var),
                })
            }
            (Controller::Settings(c), Action::DeleteEnvVar { index }) => c
                .delete_env_var(index)
                .map(|removed| ActionOutcome::EnvVarRemoved { removed }),
            (Controller::Triggers(c), Action::DeleteEnvVar { index }) => c
                .delete_env_var(index)
                .map(|removed| ActionOutcome::EnvVarRemoved { removed }),

            (Controller::Settings(c), Action::Submit) => {
                c.submit().await.map(|_| ActionOutcome::Submitted)
            }
            (Controller::Triggers(c), Action::Submit) => {
                c.submit().await.map(|_| ActionOutcome::Submitted)
            }
            (Controller::Settings(c), Action::Cancel) => {
                c.cancel();
                Ok(ActionOutcome::Cancelled)
            }
            (Controller::Triggers(c), Action::Cancel) => {
                c.cancel().await;
                Ok(ActionOutcome::Cancelled)
            }

            (controller, action) => Err(AppError::BadRequest(format!(
                "The {} view has no {} action",
                controller.name(),
                action.name()
            ))),
        }
    }
}
