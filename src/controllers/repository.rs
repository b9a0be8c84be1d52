//! Repository page: settings record, builds, and the logs of one build.

use serde::Serialize;

use super::builds::{build_rows, selected_row, BuildRow};
use crate::client::{Deferred, ResourceClient};
use crate::errors::AppError;
use crate::models::{Build, BuildLog, Repository};
use crate::routes::RouteParams;
use crate::services::repositories;

/// The reads every repository-scoped page starts from.
#[derive(Debug, Clone)]
pub struct RepositoryBuilds {
    pub org_id: String,
    pub repo_id: String,
    pub repository: Deferred<Repository>,
    pub builds: Deferred<Vec<Build>>,
}

impl RepositoryBuilds {
    pub fn load(client: &ResourceClient, params: &RouteParams) -> Result<Self, AppError> {
        let org_id = super::required(params.org_id(), "orgId")?;
        let repo_id = super::required(params.repo_id(), "repoId")?;

        Ok(Self {
            repository: repositories::get(client, org_id, repo_id),
            builds: repositories::builds(client, org_id, repo_id),
            org_id: org_id.to_string(),
            repo_id: repo_id.to_string(),
        })
    }

    pub async fn settle(&self) {
        tokio::join!(self.repository.settle(), self.builds.settle());
    }

    /// Stored settings, or blank ones while loading or when none exist.
    pub fn repository(&self) -> Repository {
        let repository = self.repository.value();
        if repository.org_id.is_empty() {
            Repository {
                env_vars: repository.env_vars,
                ..Repository::blank(&self.org_id, &self.repo_id)
            }
        } else {
            repository
        }
    }
}

#[derive(Debug)]
pub struct RepositoryController {
    base: RepositoryBuilds,
    build_id: Option<String>,
    build_logs: Option<Deferred<BuildLog>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryViewModel {
    pub org_id: String,
    pub repo_id: String,
    pub build_id: Option<String>,
    pub loaded: bool,
    pub repository: Repository,
    pub builds: Vec<BuildRow>,
    pub selected_build: Option<BuildRow>,
    pub build_logs: Option<Deferred<BuildLog>>,
}

impl RepositoryController {
    /// Logs are only requested when the route names a build.
    pub fn open(client: &ResourceClient, params: &RouteParams) -> Result<Self, AppError> {
        let base = RepositoryBuilds::load(client, params)?;
        let build_id = params.build_id().map(str::to_string);
        let build_logs = build_id
            .as_deref()
            .map(|id| repositories::logs(client, &base.org_id, &base.repo_id, id));

        Ok(Self {
            base,
            build_id,
            build_logs,
        })
    }

    pub async fn settle(&self) {
        match &self.build_logs {
            Some(logs) => {
                tokio::join!(self.base.settle(), logs.settle());
            }
            None => self.base.settle().await,
        }
    }

    pub fn view_model(&self) -> RepositoryViewModel {
        let builds = self.base.builds.value();
        RepositoryViewModel {
            org_id: self.base.org_id.clone(),
            repo_id: self.base.repo_id.clone(),
            build_id: self.build_id.clone(),
            loaded: self.base.builds.is_resolved(),
            repository: self.base.repository(),
            selected_build: selected_row(&builds, self.build_id.as_deref()),
            builds: build_rows(builds),
            build_logs: self.build_logs.clone(),
        }
    }
}
