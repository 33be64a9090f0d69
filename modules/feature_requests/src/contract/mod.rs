pub mod model;

pub use model::{FeatureRequest, FeatureStatus, NewFeatureRequest};
