pub mod reconciler;

pub use reconciler::{PropertyCache, SnapshotSource};
