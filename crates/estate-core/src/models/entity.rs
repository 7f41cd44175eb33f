//! Level-erased record wrapper.
//!
//! [`Entity`] lets import, storage and validation handle records of any
//! level uniformly while each variant stays strongly typed.

use serde::Serialize;
use serde_json::{Map, Value};

use super::{Building, Campus, Floor, Level, Organization, Portfolio, SeatZone};
use crate::error::{EstateError, EstateResult};

/// A JSON merge patch over a record's camelCase fields.
pub type RecordPatch = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Organization(Organization),
    Portfolio(Portfolio),
    Campus(Campus),
    Building(Building),
    Floor(Floor),
    SeatZone(SeatZone),
}

impl Entity {
    pub fn level(&self) -> Level {
        match self {
            Entity::Organization(_) => Level::Organization,
            Entity::Portfolio(_) => Level::Portfolio,
            Entity::Campus(_) => Level::Campus,
            Entity::Building(_) => Level::Building,
            Entity::Floor(_) => Level::Floor,
            Entity::SeatZone(_) => Level::SeatZone,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Entity::Organization(e) => &e.id,
            Entity::Portfolio(e) => &e.id,
            Entity::Campus(e) => &e.id,
            Entity::Building(e) => &e.id,
            Entity::Floor(e) => &e.id,
            Entity::SeatZone(e) => &e.id,
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        let id = id.into();
        match self {
            Entity::Organization(e) => e.id = id,
            Entity::Portfolio(e) => e.id = id,
            Entity::Campus(e) => e.id = id,
            Entity::Building(e) => e.id = id,
            Entity::Floor(e) => e.id = id,
            Entity::SeatZone(e) => e.id = id,
        }
    }

    /// The declared parent reference; `None` for organizations.
    pub fn parent_id(&self) -> Option<&str> {
        match self {
            Entity::Organization(_) => None,
            Entity::Portfolio(e) => Some(&e.organization_id),
            Entity::Campus(e) => Some(&e.portfolio_id),
            Entity::Building(e) => Some(&e.campus_id),
            Entity::Floor(e) => Some(&e.building_id),
            Entity::SeatZone(e) => Some(&e.floor_id),
        }
    }

    /// Display name. Floors have no name and use their floor number.
    pub fn display_name(&self) -> &str {
        match self {
            Entity::Organization(e) => &e.name,
            Entity::Portfolio(e) => &e.name,
            Entity::Campus(e) => &e.name,
            Entity::Building(e) => &e.name,
            Entity::Floor(e) => &e.floor_number,
            Entity::SeatZone(e) => &e.name,
        }
    }

    /// Serialize the inner record to a JSON object.
    pub fn to_value(&self) -> EstateResult<Value> {
        serde_json::to_value(self).map_err(|e| EstateError::Internal(e.to_string()))
    }

    /// Deserialize a record of the given level from JSON.
    pub fn from_value(level: Level, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match level {
            Level::Organization => Entity::Organization(serde_json::from_value(value)?),
            Level::Portfolio => Entity::Portfolio(serde_json::from_value(value)?),
            Level::Campus => Entity::Campus(serde_json::from_value(value)?),
            Level::Building => Entity::Building(serde_json::from_value(value)?),
            Level::Floor => Entity::Floor(serde_json::from_value(value)?),
            Level::SeatZone => Entity::SeatZone(serde_json::from_value(value)?),
        })
    }

    /// Apply a JSON merge patch and return the patched record.
    ///
    /// Nested objects are merged key by key; any other value replaces the
    /// existing one. The record's level cannot change.
    pub fn merge_patch(&self, patch: &RecordPatch) -> EstateResult<Self> {
        let mut current = self.to_value()?;
        merge_into(&mut current, patch);
        Entity::from_value(self.level(), current).map_err(|e| EstateError::Validation {
            message: format!("patch does not fit {}: {e}", self.level()),
        })
    }
}

fn merge_into(target: &mut Value, patch: &Map<String, Value>) {
    let Value::Object(target) = target else {
        *target = Value::Object(patch.clone());
        return;
    };
    for (key, value) in patch {
        match (target.get_mut(key), value) {
            (Some(existing @ Value::Object(_)), Value::Object(nested)) => {
                merge_into(existing, nested);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

impl From<Organization> for Entity {
    fn from(value: Organization) -> Self {
        Entity::Organization(value)
    }
}

impl From<Portfolio> for Entity {
    fn from(value: Portfolio) -> Self {
        Entity::Portfolio(value)
    }
}

impl From<Campus> for Entity {
    fn from(value: Campus) -> Self {
        Entity::Campus(value)
    }
}

impl From<Building> for Entity {
    fn from(value: Building) -> Self {
        Entity::Building(value)
    }
}

impl From<Floor> for Entity {
    fn from(value: Floor) -> Self {
        Entity::Floor(value)
    }
}

impl From<SeatZone> for Entity {
    fn from(value: SeatZone) -> Self {
        Entity::SeatZone(value)
    }
}
