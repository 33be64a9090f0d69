use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::contract::{Coordinates, NewProperty, PropertyPatch, VoteDirection};

/// Create request. `position` is accepted as a legacy input alias for
/// `coordinates`; only the canonical name exists past this boundary.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreatePropertyReq {
    pub address: String,
    pub zoning: Option<String>,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub tax_value: Option<f64>,
    pub cap_rate: Option<f64>,
    pub monthly_payment: Option<f64>,
    #[serde(alias = "position")]
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<Coordinates>,
}

/// Typed partial update. Unknown fields are rejected rather than merged;
/// vote counters and creator fields are not updatable at all.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdatePropertyReq {
    pub address: Option<String>,
    pub zoning: Option<String>,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub tax_value: Option<f64>,
    pub cap_rate: Option<f64>,
    pub monthly_payment: Option<f64>,
    #[serde(alias = "position")]
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<Coordinates>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct VoteReq {
    pub direction: VoteDirection,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteAllResp {
    pub count: u64,
}

impl From<CreatePropertyReq> for NewProperty {
    fn from(req: CreatePropertyReq) -> Self {
        Self {
            address: req.address,
            zoning: req.zoning,
            value: req.value,
            notes: req.notes,
            tax_value: req.tax_value,
            cap_rate: req.cap_rate,
            monthly_payment: req.monthly_payment,
            coordinates: req.coordinates,
        }
    }
}

impl From<UpdatePropertyReq> for PropertyPatch {
    fn from(req: UpdatePropertyReq) -> Self {
        Self {
            address: req.address,
            zoning: req.zoning,
            value: req.value,
            notes: req.notes,
            tax_value: req.tax_value,
            cap_rate: req.cap_rate,
            monthly_payment: req.monthly_payment,
            coordinates: req.coordinates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_is_accepted_as_an_input_alias() {
        let req: CreatePropertyReq =
            serde_json::from_str(r#"{"address":"1 Elm","position":[40.0,-83.0]}"#).unwrap();
        let c = req.coordinates.unwrap();
        assert_eq!(c.latitude, 40.0);
        assert_eq!(c.longitude, -83.0);
    }

    #[test]
    fn unknown_patch_fields_are_rejected() {
        let err = serde_json::from_str::<UpdatePropertyReq>(r#"{"thumbsUp": 99}"#);
        assert!(err.is_err());
    }

    #[test]
    fn invalid_direction_is_rejected() {
        assert!(serde_json::from_str::<VoteReq>(r#"{"direction":"sideways"}"#).is_err());
    }
}
