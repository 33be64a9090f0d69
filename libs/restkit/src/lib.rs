//! Shared HTTP plumbing for PlotPin modules: RFC 9457 problem responses,
//! the typed SSE broadcaster used for live fan-out, and request-id layers.

pub mod json;
pub mod problem;
pub mod request_id;
pub mod sse;

pub use json::Json;
pub use problem::{Problem, ProblemResponse};
pub use sse::SseBroadcaster;
