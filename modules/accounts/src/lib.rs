//! Accounts module: session tokens, role checks and user management.
//!
//! Only the `contract` module is a stable surface for other modules; the
//! rest is exposed for wiring and tests.

pub mod contract;

pub use contract::{Claims, Role};

pub mod api;
pub mod domain;
pub mod infra;
