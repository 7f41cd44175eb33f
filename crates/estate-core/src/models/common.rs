//! Value types shared by several hierarchy levels.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a campus or building.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStatus {
    #[default]
    Active,
    Inactive,
    Retired,
}

impl LifecycleStatus {
    pub const TOKENS: &'static [&'static str] = &["active", "inactive", "retired"];
}

/// Parking slots, either a campus capacity or an allocation to a building
/// or floor.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Parking {
    pub two_wheeler: u32,
    pub four_wheeler: u32,
    pub ev_charging: u32,
}
