//! Authorization: permission derivation and route policy.
//!
//! Two pure, synchronously testable pieces:
//!
//! - [`permissions`] - derives a [`permissions::Permissions`] set from a
//!   principal's stored privilege state
//! - [`policy`] - classifies request paths into policy classes and decides
//!   whether a principal may proceed
//!
//! The HTTP wiring lives in [`crate::middleware::gate`]; nothing in this
//! module touches a request type or performs I/O.

pub mod permissions;
pub mod policy;

pub use permissions::Permissions;
pub use policy::{Decision, PolicyClass, authorize, classify};
