//! Hierarchy level enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the six levels of the portfolio hierarchy, ordered root first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Organization,
    Portfolio,
    Campus,
    Building,
    Floor,
    SeatZone,
}

impl Level {
    /// All levels, root first.
    pub const ALL: [Level; 6] = [
        Level::Organization,
        Level::Portfolio,
        Level::Campus,
        Level::Building,
        Level::Floor,
        Level::SeatZone,
    ];

    /// The level directly above this one, `None` for the root.
    pub fn parent(self) -> Option<Level> {
        match self {
            Level::Organization => None,
            Level::Portfolio => Some(Level::Organization),
            Level::Campus => Some(Level::Portfolio),
            Level::Building => Some(Level::Campus),
            Level::Floor => Some(Level::Building),
            Level::SeatZone => Some(Level::Floor),
        }
    }

    /// The level directly below this one, `None` for seat zones.
    pub fn child(self) -> Option<Level> {
        match self {
            Level::Organization => Some(Level::Portfolio),
            Level::Portfolio => Some(Level::Campus),
            Level::Campus => Some(Level::Building),
            Level::Building => Some(Level::Floor),
            Level::Floor => Some(Level::SeatZone),
            Level::SeatZone => None,
        }
    }

    /// Position in [`Level::ALL`].
    pub fn depth(self) -> usize {
        self as usize
    }

    /// Storage table name.
    pub fn table(self) -> &'static str {
        match self {
            Level::Organization => "organization",
            Level::Portfolio => "portfolio",
            Level::Campus => "campus",
            Level::Building => "building",
            Level::Floor => "floor",
            Level::SeatZone => "seat_zone",
        }
    }

    /// Name of the field holding the parent reference (camelCase, as it
    /// appears in records and import columns).
    pub fn parent_field(self) -> Option<&'static str> {
        match self {
            Level::Organization => None,
            Level::Portfolio => Some("organizationId"),
            Level::Campus => Some("portfolioId"),
            Level::Building => Some("campusId"),
            Level::Floor => Some("buildingId"),
            Level::SeatZone => Some("floorId"),
        }
    }

    /// Prefix used for generated identifiers.
    pub fn id_prefix(self) -> &'static str {
        match self {
            Level::Organization => "ORG",
            Level::Portfolio => "PF",
            Level::Campus => "CMP",
            Level::Building => "BLD",
            Level::Floor => "FLR",
            Level::SeatZone => "SZ",
        }
    }

    /// Generate a fresh human-readable identifier, e.g. `BLD-3F2A1B9C`.
    pub fn generate_id(self) -> String {
        let raw = Uuid::new_v4().simple().to_string().to_uppercase();
        format!("{}-{}", self.id_prefix(), &raw[..8])
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Level::Organization => "Organization",
            Level::Portfolio => "Portfolio",
            Level::Campus => "Campus",
            Level::Building => "Building",
            Level::Floor => "Floor",
            Level::SeatZone => "Seat zone",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.table())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "organization" | "org" => Ok(Level::Organization),
            "portfolio" => Ok(Level::Portfolio),
            "campus" => Ok(Level::Campus),
            "building" => Ok(Level::Building),
            "floor" => Ok(Level::Floor),
            "seat_zone" | "seatzone" | "zone" => Ok(Level::SeatZone),
            _ => Err(format!("unknown hierarchy level: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_and_child_are_inverse() {
        for level in Level::ALL {
            if let Some(child) = level.child() {
                assert_eq!(child.parent(), Some(level));
            }
        }
        assert_eq!(Level::Organization.parent(), None);
        assert_eq!(Level::SeatZone.child(), None);
    }

    #[test]
    fn depth_matches_position() {
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.depth(), i);
        }
    }

    #[test]
    fn generated_ids_carry_prefix() {
        let id = Level::Building.generate_id();
        assert!(id.starts_with("BLD-"));
        assert_eq!(id.len(), "BLD-".len() + 8);
        assert_ne!(id, Level::Building.generate_id());
    }

    #[test]
    fn parses_level_names() {
        assert_eq!("Seat-Zone".parse::<Level>().unwrap(), Level::SeatZone);
        assert_eq!(" campus ".parse::<Level>().unwrap(), Level::Campus);
        assert!("wing".parse::<Level>().is_err());
    }
}
