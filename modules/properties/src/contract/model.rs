use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Canonical coordinate pair, latitude then longitude.
///
/// The external representation is a two-element JSON array. Both elements
/// must be finite; NaN and infinities are rejected at the boundary so they
/// can never reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinatesError);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("coordinates must be two finite numbers")]
pub struct CoordinatesError;

impl TryFrom<[f64; 2]> for Coordinates {
    type Error = CoordinatesError;

    fn try_from(pair: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(pair[0], pair[1])
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.latitude, c.longitude]
    }
}

/// A map-pinned property record. The creator name is a denormalized snapshot
/// taken at creation time and never updated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub address: String,
    pub zoning: String,
    pub value: f64,
    pub notes: String,
    pub tax_value: Option<f64>,
    pub cap_rate: Option<f64>,
    pub monthly_payment: Option<f64>,
    #[schema(value_type = Option<Vec<f64>>)]
    pub coordinates: Option<Coordinates>,
    pub thumbs_up: i64,
    pub thumbs_down: i64,
    pub creator_id: Option<Uuid>,
    pub creator_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a property. Everything except the address is optional
/// and defaulted by the domain service.
#[derive(Debug, Clone, Default)]
pub struct NewProperty {
    pub address: String,
    pub zoning: Option<String>,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub tax_value: Option<f64>,
    pub cap_rate: Option<f64>,
    pub monthly_payment: Option<f64>,
    pub coordinates: Option<Coordinates>,
}

/// Typed partial update; only present fields are applied. Vote counters and
/// creator fields are deliberately absent: counters change only through
/// voting and the creator snapshot is immutable.
#[derive(Debug, Clone, Default)]
pub struct PropertyPatch {
    pub address: Option<String>,
    pub zoning: Option<String>,
    pub value: Option<f64>,
    pub notes: Option<String>,
    pub tax_value: Option<f64>,
    pub cap_rate: Option<f64>,
    pub monthly_payment: Option<f64>,
    pub coordinates: Option<Coordinates>,
}

impl PropertyPatch {
    pub fn is_empty(&self) -> bool {
        self.address.is_none()
            && self.zoning.is_none()
            && self.value.is_none()
            && self.notes.is_none()
            && self.tax_value.is_none()
            && self.cap_rate.is_none()
            && self.monthly_payment.is_none()
            && self.coordinates.is_none()
    }
}

/// Which counter a vote bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}
