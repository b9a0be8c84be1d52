//! Signed-in user profile and logout.

use crate::client::{Deferred, Params, Resource, ResourceClient};
use crate::errors::AppError;
use crate::models::Profile;

pub const PROFILE: Resource = Resource::cached("profile", "/api/profile");
pub const LOGOUT: Resource = Resource::new("logout", "/logout");

/// GET /api/profile
pub fn get(client: &ResourceClient) -> Deferred<Profile> {
    client.get(&PROFILE, &Params::new())
}

/// GET /logout, then forget everything cached for this user.
pub async fn logout(client: &ResourceClient) -> Result<(), AppError> {
    let result = client.fetch_text(&LOGOUT, &Params::new()).await.map(|_| ());
    client.cache().clear();
    result
}
