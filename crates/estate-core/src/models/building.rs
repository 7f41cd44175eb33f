//! Building domain model.
//!
//! A building is either owned or leased. Lease terms are carried only by
//! leased buildings; the validator enforces that pairing before writes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::common::{LifecycleStatus, Parking};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipType {
    #[default]
    Owned,
    Leased,
}

impl OwnershipType {
    pub const TOKENS: &'static [&'static str] = &["owned", "leased"];
}

/// Commercial terms of a leased building.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LeaseDetails {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub monthly_rent: f64,
    /// Common-area maintenance charge per month.
    pub cam_charge: f64,
    pub security_deposit: f64,
    /// ISO 4217 currency code.
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Building {
    pub id: String,
    pub campus_id: String,
    pub name: String,
    /// Short site code, e.g. `BLR-T1`.
    pub code: String,
    pub alias: String,
    /// Built-up area (BUA) in square feet.
    pub built_up_area: f64,
    /// Rentable area (RA) in square feet.
    pub rentable_area: f64,
    pub carpet_area: f64,
    pub floor_count: u32,
    pub ownership_type: OwnershipType,
    /// Present iff `ownership_type` is [`OwnershipType::Leased`].
    pub lease_details: Option<LeaseDetails>,
    pub status: LifecycleStatus,
    pub parking: Parking,
}

impl Building {
    pub fn is_leased(&self) -> bool {
        self.ownership_type == OwnershipType::Leased
    }
}
