//! Organizations page with the per-repository webhook switch.

use serde::Serialize;

use crate::client::{Deferred, ResourceClient};
use crate::errors::AppError;
use crate::models::{find_repository_mut, Organization};
use crate::routes::RouteParams;
use crate::services::organizations;

/// Which hook call a toggle issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum HookChange {
    Created,
    Removed,
}

#[derive(Debug)]
pub struct OrganizationsController {
    client: ResourceClient,
    org_id: Option<String>,
    organizations: Deferred<Vec<Organization>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationsViewModel {
    pub org_id: Option<String>,
    pub loaded: bool,
    pub organizations: Deferred<Vec<Organization>>,
    pub selected: Option<Organization>,
}

impl OrganizationsController {
    pub fn open(client: &ResourceClient, params: &RouteParams) -> Self {
        Self {
            client: client.clone(),
            org_id: params.org_id().map(str::to_string),
            organizations: organizations::list(client),
        }
    }

    pub async fn settle(&self) {
        self.organizations.settle().await;
    }

    /// Apply the switch position the user set on a repository.
    ///
    /// `hooked == true` installs the webhook, `false` removes it; exactly one
    /// backend call per toggle. On success the cached organizations list is
    /// dropped and read again. On failure the switch goes back.
    pub async fn switch_repo(
        &mut self,
        org_id: Option<&str>,
        repo_id: &str,
        hooked: bool,
    ) -> Result<HookChange, AppError> {
        let org_id = org_id
            .or(self.org_id.as_deref())
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Organization is required".to_string()))?;

        let previous = self.set_hooked(&org_id, repo_id, hooked);

        let result = if hooked {
            organizations::create_hook(&self.client, &org_id, repo_id)
                .await
                .map(|_| HookChange::Created)
        } else {
            organizations::delete_hook(&self.client, &org_id, repo_id)
                .await
                .map(|_| HookChange::Removed)
        };

        match result {
            Ok(change) => {
                tracing::info!("Hook {:?} for {}/{}", change, org_id, repo_id);
                organizations::invalidate(&self.client);
                self.organizations = organizations::list(&self.client);
                Ok(change)
            }
            Err(e) => {
                tracing::error!("Failed to switch hook for {}/{}: {}", org_id, repo_id, e);
                if let Some(previous) = previous {
                    self.set_hooked(&org_id, repo_id, previous);
                }
                Err(e)
            }
        }
    }

    /// Set the flag in the bound list, returning what it was.
    fn set_hooked(&self, org_id: &str, repo_id: &str, hooked: bool) -> Option<bool> {
        let mut previous = None;
        self.organizations.modify(|orgs| {
            if let Some(repo) = find_repository_mut(orgs, org_id, repo_id) {
                previous = Some(repo.hooked);
                repo.hooked = hooked;
            }
        });
        previous
    }

    pub fn view_model(&self) -> OrganizationsViewModel {
        let selected = self.org_id.as_deref().and_then(|id| {
            self.organizations
                .value()
                .into_iter()
                .find(|org| org.name == id)
        });

        OrganizationsViewModel {
            org_id: self.org_id.clone(),
            loaded: self.organizations.is_resolved(),
            organizations: self.organizations.clone(),
            selected,
        }
    }
}
