//! Properties module: the shared pin board.
//!
//! Business logic for create/read/update/delete/vote on property records,
//! the live fan-out of committed mutations to connected viewers, and the
//! client-side cache that merges those events.

pub mod contract;

pub use contract::{Coordinates, Property, VoteDirection};

pub mod api;
pub mod client;
pub mod domain;
pub mod infra;
