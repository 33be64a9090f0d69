use serde::Deserialize;
use utoipa::ToSchema;

use crate::contract::{FeatureStatus, NewFeatureRequest};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateFeatureRequestReq {
    pub description: String,
    pub submitter_email: Option<String>,
}

/// Status is the only field an admin moves after submission.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateFeatureRequestReq {
    pub status: FeatureStatus,
}

impl From<CreateFeatureRequestReq> for NewFeatureRequest {
    fn from(req: CreateFeatureRequestReq) -> Self {
        Self {
            description: req.description,
            submitter_email: req.submitter_email,
        }
    }
}
