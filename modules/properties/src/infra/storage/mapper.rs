//! Row <-> domain conversion. Uuids, timestamps and the coordinate array are
//! TEXT in storage; parse failures surface as errors instead of silently
//! corrupt entities.

use anyhow::Context;
use uuid::Uuid;

use crate::contract::{Coordinates, Property};
use crate::infra::storage::entity::PropertyRow;

pub fn row_to_property(row: PropertyRow) -> anyhow::Result<Property> {
    let coordinates = row
        .coordinates
        .as_deref()
        .map(|raw| {
            serde_json::from_str::<Coordinates>(raw)
                .with_context(|| format!("bad coordinates for property {}", row.id))
        })
        .transpose()?;

    Ok(Property {
        id: Uuid::parse_str(&row.id).context("bad property id")?,
        address: row.address,
        zoning: row.zoning,
        value: row.value,
        notes: row.notes,
        tax_value: row.tax_value,
        cap_rate: row.cap_rate,
        monthly_payment: row.monthly_payment,
        coordinates,
        thumbs_up: row.thumbs_up,
        thumbs_down: row.thumbs_down,
        creator_id: row
            .creator_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .context("bad creator id")?,
        creator_name: row.creator_name,
        created_at: db::time::decode_ts(&row.created_at)?,
        updated_at: db::time::decode_ts(&row.updated_at)?,
    })
}

pub fn property_to_row(p: &Property) -> anyhow::Result<PropertyRow> {
    let coordinates = p
        .coordinates
        .map(|c| serde_json::to_string(&c))
        .transpose()
        .context("coordinates encoding failed")?;

    Ok(PropertyRow {
        id: p.id.to_string(),
        address: p.address.clone(),
        zoning: p.zoning.clone(),
        value: p.value,
        notes: p.notes.clone(),
        tax_value: p.tax_value,
        cap_rate: p.cap_rate,
        monthly_payment: p.monthly_payment,
        coordinates,
        thumbs_up: p.thumbs_up,
        thumbs_down: p.thumbs_down,
        creator_id: p.creator_id.map(|id| id.to_string()),
        creator_name: p.creator_name.clone(),
        created_at: db::time::encode_ts(p.created_at),
        updated_at: db::time::encode_ts(p.updated_at),
    })
}
