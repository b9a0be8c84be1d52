//! Typed bindings for each backend resource kind.
//!
//! One small function per call, over the generic [`ResourceClient`]. Mutations
//! invalidate the collections that embed what they changed.
//!
//! [`ResourceClient`]: crate::client::ResourceClient

pub mod builds;
pub mod organizations;
pub mod profile;
pub mod repositories;
pub mod triggers;
