//! Campus domain model.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::common::{LifecycleStatus, Parking};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CampusType {
    #[default]
    Corporate,
    TechPark,
    Industrial,
    MixedUse,
    Retail,
}

impl CampusType {
    pub const TOKENS: &'static [&'static str] =
        &["corporate", "tech_park", "industrial", "mixed_use", "retail"];
}

/// Sustainability features of a campus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GreenInfrastructure {
    pub has_solar: bool,
    pub has_rainwater_harvesting: bool,
    pub has_sewage_treatment: bool,
    /// Share of the site that is landscaped, 0–100.
    pub green_area_percentage: f64,
}

/// A site containing one or more buildings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Campus {
    pub id: String,
    pub portfolio_id: String,
    pub name: String,
    pub city: String,
    pub address: String,
    /// Free-form coordinates, usually `lat,lng`.
    pub gps: String,
    #[serde(rename = "type")]
    pub campus_type: CampusType,
    pub status: LifecycleStatus,
    pub parking: Parking,
    pub amenities: BTreeSet<String>,
    pub green_infrastructure: GreenInfrastructure,
    /// Whether business-continuity / disaster-recovery space is available.
    pub bcp_dr_available: bool,
}
