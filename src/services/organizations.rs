//! Organizations list and repository webhooks.

use crate::client::{params, Deferred, Params, Resource, ResourceClient};
use crate::errors::AppError;
use crate::models::Organization;

pub const ORGANIZATIONS: Resource = Resource::cached("organizations", "/api/organizations");
pub const HOOK: Resource = Resource::new(
    "hook",
    "/api/organizations/:orgId/repositories/:repoId/hook",
);

/// GET /api/organizations
pub fn list(client: &ResourceClient) -> Deferred<Vec<Organization>> {
    client.query(&ORGANIZATIONS, &Params::new())
}

/// POST /api/organizations/:orgId/repositories/:repoId/hook
pub async fn create_hook(client: &ResourceClient, org_id: &str, repo_id: &str) -> Result<(), AppError> {
    client
        .save(&HOOK, &params([("orgId", org_id), ("repoId", repo_id)]), &())
        .await
}

/// DELETE /api/organizations/:orgId/repositories/:repoId/hook
pub async fn delete_hook(client: &ResourceClient, org_id: &str, repo_id: &str) -> Result<(), AppError> {
    client
        .delete(&HOOK, &params([("orgId", org_id), ("repoId", repo_id)]))
        .await
}

/// Drop the cached organizations list; the `hooked` flags live there.
pub fn invalidate(client: &ResourceClient) -> usize {
    client.cache().remove_all(ORGANIZATIONS.kind)
}
