//! Global build list.

use crate::client::{Deferred, Params, Resource, ResourceClient};
use crate::models::Build;

pub const BUILDS: Resource = Resource::cached("builds", "/api/builds");

/// GET /api/builds
pub fn list(client: &ResourceClient) -> Deferred<Vec<Build>> {
    client.query(&BUILDS, &Params::new())
}
