//! Triggers page: list, selected trigger and the trigger form.

use serde::Serialize;

use crate::client::{Deferred, ResourceClient};
use crate::errors::AppError;
use crate::models::{append_env_var, find_trigger, remove_env_var, EnvVar, Trigger};
use crate::routes::RouteParams;
use crate::services::triggers;

#[derive(Debug)]
pub struct TriggersController {
    client: ResourceClient,
    org_id: String,
    repo_id: String,
    trigger_id: Option<String>,
    triggers: Deferred<Vec<Trigger>>,
    trigger: Trigger,
    selection_resolved: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggersViewModel {
    pub org_id: String,
    pub repo_id: String,
    pub trigger_id: Option<String>,
    pub loaded: bool,
    pub triggers: Deferred<Vec<Trigger>>,
    pub trigger: Trigger,
    pub new_env_var: EnvVar,
}

impl TriggersController {
    pub fn open(client: &ResourceClient, params: &RouteParams) -> Result<Self, AppError> {
        let org_id = super::required(params.org_id(), "orgId")?;
        let repo_id = super::required(params.repo_id(), "repoId")?;
        let trigger_id = params.trigger_id().map(str::to_string);

        Ok(Self {
            client: client.clone(),
            triggers: triggers::list(client, org_id, repo_id),
            trigger: Trigger::template(org_id, repo_id),
            selection_resolved: trigger_id.is_none(),
            org_id: org_id.to_string(),
            repo_id: repo_id.to_string(),
            trigger_id,
        })
    }

    pub async fn settle(&mut self) {
        self.triggers.settle().await;
        if !self.selection_resolved {
            self.resolve_selection().await;
        }
    }

    /// Point the form at the trigger named by the route, matched on its id.
    /// Anything that goes wrong leaves the blank new-trigger form.
    async fn resolve_selection(&mut self) {
        self.selection_resolved = true;
        let Some(id) = self.trigger_id.as_deref() else {
            return;
        };

        match self.triggers.wait().await {
            Ok(list) => match find_trigger(&list, id) {
                Some(found) => self.trigger = found.clone(),
                None => {
                    tracing::warn!(
                        "Trigger {} not found for {}/{}, showing a new trigger",
                        id,
                        self.org_id,
                        self.repo_id
                    );
                    self.trigger = Trigger::template(&self.org_id, &self.repo_id);
                }
            },
            Err(e) => {
                tracing::warn!("Error getting trigger {}: {}", id, e);
                self.trigger = Trigger::template(&self.org_id, &self.repo_id);
            }
        }
    }

    pub fn add_env_var(&mut self, var: EnvVar) -> usize {
        append_env_var(&mut self.trigger.env_vars, var)
    }

    pub fn delete_env_var(&mut self, index: usize) -> Result<EnvVar, AppError> {
        remove_env_var(&mut self.trigger.env_vars, index).inspect_err(|e| {
            tracing::warn!("Cannot delete env var: {}", e);
        })
    }

    /// Save the trigger in the form and read the list again.
    pub async fn submit(&mut self) -> Result<(), AppError> {
        if let Err(e) = triggers::save(&self.client, &self.trigger).await {
            tracing::error!(
                "Failed to save trigger for {}/{}: {}",
                self.org_id,
                self.repo_id,
                e
            );
            return Err(e);
        }

        tracing::info!("Saved {:?} trigger for {}/{}", self.trigger.event, self.org_id, self.repo_id);
        self.triggers = triggers::list(&self.client, &self.org_id, &self.repo_id);
        Ok(())
    }

    /// Throw the form edits away and select again from the current list.
    pub async fn cancel(&mut self) {
        self.trigger = Trigger::template(&self.org_id, &self.repo_id);
        self.resolve_selection().await;
    }

    pub fn view_model(&self) -> TriggersViewModel {
        TriggersViewModel {
            org_id: self.org_id.clone(),
            repo_id: self.repo_id.clone(),
            trigger_id: self.trigger_id.clone(),
            loaded: self.triggers.is_resolved(),
            triggers: self.triggers.clone(),
            trigger: self.trigger.clone(),
            new_env_var: EnvVar::default(),
        }
    }
}
