//! Data models for the Gocilla dashboard.
//!
//! These models match the backend JSON documents exactly so responses can be
//! cached as raw values and decoded on demand.

mod build;
mod env_var;
mod organization;
mod profile;
mod repository;
mod trigger;

pub use build::*;
pub use env_var::*;
pub use organization::*;
pub use profile::*;
pub use repository::*;
pub use trigger::*;

use serde::{Deserialize, Deserializer};

/// Decode a `null` collection as its empty default.
///
/// The backend serializes unset slices as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
