//! Repository settings, repository builds and build logs.

use crate::client::{params, Deferred, Resource, ResourceClient};
use crate::errors::AppError;
use crate::models::{Build, BuildLog, Repository};

pub const REPOSITORY: Resource = Resource::cached(
    "repository",
    "/api/organizations/:orgId/repositories/:repoId",
);
pub const REPOSITORY_BUILDS: Resource = Resource::cached(
    "repositoryBuilds",
    "/api/organizations/:orgId/repositories/:repoId/builds",
);
pub const BUILD_LOGS: Resource = Resource::new(
    "buildLogs",
    "/api/organizations/:orgId/repositories/:repoId/builds/:buildId/logs",
);

/// GET /api/organizations/:orgId/repositories/:repoId
pub fn get(client: &ResourceClient, org_id: &str, repo_id: &str) -> Deferred<Repository> {
    client.get(&REPOSITORY, &params([("orgId", org_id), ("repoId", repo_id)]))
}

/// POST /api/organizations/:orgId/repositories/:repoId with the whole record.
///
/// The client drops the cached record (and everything under its path) once
/// the backend accepts it.
pub async fn save(client: &ResourceClient, repository: &Repository) -> Result<(), AppError> {
    client
        .save(
            &REPOSITORY,
            &params([
                ("orgId", repository.org_id.as_str()),
                ("repoId", repository.repo_id.as_str()),
            ]),
            repository,
        )
        .await
}

/// GET /api/organizations/:orgId/repositories/:repoId/builds
pub fn builds(client: &ResourceClient, org_id: &str, repo_id: &str) -> Deferred<Vec<Build>> {
    client.query(
        &REPOSITORY_BUILDS,
        &params([("orgId", org_id), ("repoId", repo_id)]),
    )
}

/// GET .../builds/:buildId/logs, always from the backend.
pub fn logs(client: &ResourceClient, org_id: &str, repo_id: &str, build_id: &str) -> Deferred<BuildLog> {
    let client = client.clone();
    let params = params([("orgId", org_id), ("repoId", repo_id), ("buildId", build_id)]);
    Deferred::spawn(async move {
        let result = client
            .fetch_text(&BUILD_LOGS, &params)
            .await
            .map(|text| BuildLog::from_text(&text));
        if let Err(e) = &result {
            tracing::warn!("Failed to fetch build logs {:?}: {}", params, e);
        }
        result
    })
}
