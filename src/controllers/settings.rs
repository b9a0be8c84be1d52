//! Repository settings form.
//!
//! Edits go to a working copy of the stored record. Submitting saves the
//! whole record and reads it back; cancelling throws the working copy away
//! and reads the record again, without asking.

use serde::Serialize;

use super::builds::{build_rows, BuildRow};
use super::repository::RepositoryBuilds;
use crate::client::ResourceClient;
use crate::errors::AppError;
use crate::models::{append_env_var, remove_env_var, EnvVar, Repository};
use crate::routes::RouteParams;
use crate::services::repositories;

#[derive(Debug)]
pub struct SettingsController {
    client: ResourceClient,
    base: RepositoryBuilds,
    working: Option<Repository>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsViewModel {
    pub org_id: String,
    pub repo_id: String,
    pub loaded: bool,
    pub dirty: bool,
    pub repository: Repository,
    pub new_env_var: EnvVar,
    pub builds: Vec<BuildRow>,
}

impl SettingsController {
    pub fn open(client: &ResourceClient, params: &RouteParams) -> Result<Self, AppError> {
        Ok(Self {
            client: client.clone(),
            base: RepositoryBuilds::load(client, params)?,
            working: None,
        })
    }

    pub async fn settle(&self) {
        self.base.settle().await;
    }

    /// The record being edited. Edits only start from a record that was
    /// actually read; a blank stand-in would overwrite the stored one.
    fn working_copy(&mut self) -> Result<&mut Repository, AppError> {
        if self.working.is_none() {
            let stored = &self.base.repository;
            if let Some(e) = stored.error() {
                return Err(AppError::NotLoaded(format!(
                    "Settings for {}/{} could not be read: {}",
                    self.base.org_id, self.base.repo_id, e
                )));
            }
            if !stored.is_resolved() {
                return Err(AppError::NotLoaded(format!(
                    "Settings for {}/{} are still loading",
                    self.base.org_id, self.base.repo_id
                )));
            }
        }

        let base = &self.base;
        Ok(self.working.get_or_insert_with(|| base.repository()))
    }

    pub fn add_env_var(&mut self, var: EnvVar) -> Result<usize, AppError> {
        Ok(append_env_var(&mut self.working_copy()?.env_vars, var))
    }

    pub fn delete_env_var(&mut self, index: usize) -> Result<EnvVar, AppError> {
        remove_env_var(&mut self.working_copy()?.env_vars, index).inspect_err(|e| {
            tracing::warn!("Cannot delete env var: {}", e);
        })
    }

    /// Save the working copy. On failure the edits stay in place.
    pub async fn submit(&mut self) -> Result<(), AppError> {
        let draft = self.working_copy()?.clone();

        if let Err(e) = repositories::save(&self.client, &draft).await {
            tracing::error!(
                "Failed to save settings for {}/{}: {}",
                draft.org_id,
                draft.repo_id,
                e
            );
            return Err(e);
        }

        tracing::info!("Saved settings for {}/{}", draft.org_id, draft.repo_id);
        self.reload();
        Ok(())
    }

    /// Drop unsaved edits and read the record from the backend again.
    pub fn cancel(&mut self) {
        if let Ok(key) = self.client.cache_key(
            &repositories::REPOSITORY,
            &crate::client::params([
                ("orgId", self.base.org_id.as_str()),
                ("repoId", self.base.repo_id.as_str()),
            ]),
        ) {
            self.client.cache().remove(repositories::REPOSITORY.kind, &key);
        }
        self.reload();
    }

    fn reload(&mut self) {
        self.working = None;
        self.base.repository = repositories::get(&self.client, &self.base.org_id, &self.base.repo_id);
    }

    pub fn view_model(&self) -> SettingsViewModel {
        let stored = self.base.repository();
        let repository = self.working.clone().unwrap_or_else(|| stored.clone());

        SettingsViewModel {
            org_id: self.base.org_id.clone(),
            repo_id: self.base.repo_id.clone(),
            loaded: self.base.repository.is_resolved(),
            dirty: repository != stored,
            repository,
            new_env_var: EnvVar::default(),
            builds: build_rows(self.base.builds.value()),
        }
    }
}
