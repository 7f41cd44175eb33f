//! Seat-zone domain model.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum OccupancyStatus {
    #[default]
    Free,
    Assigned,
    Reserved,
}

impl OccupancyStatus {
    pub const TOKENS: &'static [&'static str] = &["free", "assigned", "reserved"];
}

/// A bookable zone of seats on a floor; the leaves of the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SeatZone {
    pub id: String,
    pub floor_id: String,
    pub name: String,
    pub occupancy_status: OccupancyStatus,
}
