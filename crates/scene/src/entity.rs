//! The canonical entity-marker projection consumed from the external store.
//!
//! The business-entity store owns the full records; this core only reads an
//! ordered snapshot of display projections and never mutates it. The richer
//! external shape is narrowed into `EntityMarker` here, at the boundary, so
//! nothing downstream handles loosely-shaped data.

use bevy::prelude::*;
use serde::Deserialize;

/// Closed set of entity categories. Drives marker size and shape lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityCategory {
    Venue,
    Experience,
    Brand,
    Development,
    Package,
    Program,
    Room,
}

impl EntityCategory {
    pub fn label(self) -> &'static str {
        match self {
            EntityCategory::Venue => "Venue",
            EntityCategory::Experience => "Experience",
            EntityCategory::Brand => "Brand",
            EntityCategory::Development => "Development",
            EntityCategory::Package => "Package",
            EntityCategory::Program => "Program",
            EntityCategory::Room => "Room",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "venue" => EntityCategory::Venue,
            "experience" => EntityCategory::Experience,
            "brand" => EntityCategory::Brand,
            "development" => EntityCategory::Development,
            "package" => EntityCategory::Package,
            "program" => EntityCategory::Program,
            "room" => EntityCategory::Room,
            _ => EntityCategory::Venue,
        }
    }
}

/// Grouping layer, used only for label display and connection grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLayer {
    Core,
    Offer,
    Reach,
}

impl EntityLayer {
    pub fn label(self) -> &'static str {
        match self {
            EntityLayer::Core => "Core",
            EntityLayer::Offer => "Offer",
            EntityLayer::Reach => "Reach",
        }
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "core" => EntityLayer::Core,
            "offer" => EntityLayer::Offer,
            "reach" => EntityLayer::Reach,
            _ => EntityLayer::Core,
        }
    }
}

/// Read-only display projection of one business entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMarker {
    pub id: String,
    pub name: String,
    pub category: EntityCategory,
    pub layer: EntityLayer,
    pub description: String,
    pub kpi_label: String,
    pub kpi_value: String,
    /// Board position, both axes in [0,100].
    pub position2d: Vec2,
    /// True when any associated issue is high-priority and unresolved.
    /// Forces the alert color regardless of category or theme.
    pub has_urgent_issue: bool,
}

/// The ordered snapshot handed in by the external store. Marker entities are
/// rebuilt whenever this resource changes.
#[derive(Resource, Debug, Default)]
pub struct EntitySnapshot(pub Vec<EntityMarker>);

/// Issue as the external store serializes it; only priority/resolution are
/// relevant here.
#[derive(Debug, Deserialize)]
pub struct RawIssue {
    pub priority: String,
    #[serde(default)]
    pub resolved: bool,
}

/// The external store's richer entity shape. Optional fields tolerate partial
/// records; the adapter supplies defaults instead of rejecting.
#[derive(Debug, Deserialize)]
pub struct RawEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kpi_label: String,
    #[serde(default)]
    pub kpi_value: String,
    pub x: Option<f32>,
    pub y: Option<f32>,
    #[serde(default)]
    pub issues: Vec<RawIssue>,
}

/// Board center, the default for records with missing or non-finite
/// coordinates. One malformed record never breaks the whole scene.
const CENTER: f32 = 50.0;

fn coordinate_or_center(v: Option<f32>) -> f32 {
    match v {
        Some(v) if v.is_finite() => v.clamp(0.0, 100.0),
        _ => CENTER,
    }
}

/// Narrow one external record into the canonical marker projection.
pub fn adapt_entity(raw: &RawEntity) -> EntityMarker {
    let has_urgent_issue = raw
        .issues
        .iter()
        .any(|issue| !issue.resolved && issue.priority.eq_ignore_ascii_case("high"));

    EntityMarker {
        id: raw.id.clone(),
        name: raw.name.clone(),
        category: EntityCategory::parse(&raw.category),
        layer: EntityLayer::parse(&raw.layer),
        description: raw.description.clone(),
        kpi_label: raw.kpi_label.clone(),
        kpi_value: raw.kpi_value.clone(),
        position2d: Vec2::new(
            coordinate_or_center(raw.x),
            coordinate_or_center(raw.y),
        ),
        has_urgent_issue,
    }
}

/// Parse a JSON snapshot from the external store into marker projections.
pub fn parse_snapshot(json: &str) -> Result<Vec<EntityMarker>, serde_json::Error> {
    let raw: Vec<RawEntity> = serde_json::from_str(json)?;
    Ok(raw.iter().map(adapt_entity).collect())
}
