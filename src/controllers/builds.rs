//! Global builds page, plus the build row shared with repository pages.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::client::{Deferred, ResourceClient};
use crate::models::{find_build, Build};
use crate::routes::RouteParams;
use crate::services::builds;

/// A build with its display labels.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRow {
    #[serde(flatten)]
    pub build: Build,
    pub duration: Option<String>,
    pub started: Option<String>,
}

impl BuildRow {
    pub fn new(build: Build, now: DateTime<Utc>) -> Self {
        Self {
            duration: build.duration_label(),
            started: build.started_label(now),
            build,
        }
    }
}

pub fn build_rows(builds: Vec<Build>) -> Vec<BuildRow> {
    let now = Utc::now();
    builds.into_iter().map(|b| BuildRow::new(b, now)).collect()
}

pub fn selected_row(builds: &[Build], build_id: Option<&str>) -> Option<BuildRow> {
    build_id
        .and_then(|id| find_build(builds, id))
        .map(|b| BuildRow::new(b.clone(), Utc::now()))
}

#[derive(Debug)]
pub struct BuildsController {
    build_id: Option<String>,
    builds: Deferred<Vec<Build>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildsViewModel {
    pub build_id: Option<String>,
    pub loaded: bool,
    pub builds: Vec<BuildRow>,
    pub selected_build: Option<BuildRow>,
}

impl BuildsController {
    pub fn open(client: &ResourceClient, params: &RouteParams) -> Self {
        Self {
            build_id: params.build_id().map(str::to_string),
            builds: builds::list(client),
        }
    }

    pub async fn settle(&self) {
        self.builds.settle().await;
    }

    pub fn view_model(&self) -> BuildsViewModel {
        let builds = self.builds.value();
        BuildsViewModel {
            build_id: self.build_id.clone(),
            loaded: self.builds.is_resolved(),
            selected_build: selected_row(&builds, self.build_id.as_deref()),
            builds: build_rows(builds),
        }
    }
}
