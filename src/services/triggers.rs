//! Triggers registered on a repository.

use crate::client::{params, Deferred, Params, Resource, ResourceClient};
use crate::errors::AppError;
use crate::models::Trigger;

pub const TRIGGERS: Resource = Resource::cached("triggers", "/api/triggers");

fn list_params(org_id: &str, repo_id: &str) -> Params {
    params([("organization", org_id), ("repository", repo_id)])
}

/// GET /api/triggers?organization=&repository=
pub fn list(client: &ResourceClient, org_id: &str, repo_id: &str) -> Deferred<Vec<Trigger>> {
    client.query(&TRIGGERS, &list_params(org_id, repo_id))
}

/// POST /api/triggers, then drop the cached list of the trigger's repository.
pub async fn save(client: &ResourceClient, trigger: &Trigger) -> Result<(), AppError> {
    client.save(&TRIGGERS, &Params::new(), trigger).await?;

    let key = client.cache_key(
        &TRIGGERS,
        &list_params(&trigger.organization, &trigger.repository),
    )?;
    client.cache().remove(TRIGGERS.kind, &key);
    Ok(())
}
