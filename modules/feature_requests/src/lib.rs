//! Feature requests: an open suggestion box with an admin-driven status
//! lifecycle. New submissions trigger a best-effort mail notification that
//! never blocks or fails the request itself.

pub mod contract;

pub use contract::{FeatureRequest, FeatureStatus};

pub mod api;
pub mod domain;
pub mod infra;
