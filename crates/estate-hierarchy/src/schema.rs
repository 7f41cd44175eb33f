//! Flattened column schemas for each hierarchy level.
//!
//! A schema lists every column of a level in canonical order. Nested record
//! fields use dot-separated paths (`leaseDetails.monthlyRent`) that mirror
//! the camelCase serde names of the models, so a decoded row can be
//! assembled into JSON and deserialized directly.

use estate_core::models::{CampusType, Level, LifecycleStatus, OccupancyStatus, OwnershipType};

/// How a column's text is coerced into a record value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Unsigned integer; empty or invalid input becomes 0.
    Integer,
    /// Float; empty or invalid input becomes 0.
    Float,
    /// `true` (any case) is true, anything else false.
    Bool,
    /// Comma-separated set of tags.
    Tags,
    /// One of the listed lowercase tokens; an empty cell keeps the default.
    Enum(&'static [&'static str]),
    /// ISO `YYYY-MM-DD`; an empty cell means no date.
    Date,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Column name; dots separate nested record fields.
    pub path: &'static str,
    pub kind: FieldKind,
    /// Value shown in generated templates.
    pub example: &'static str,
}

const fn field(path: &'static str, kind: FieldKind, example: &'static str) -> FieldSpec {
    FieldSpec {
        path,
        kind,
        example,
    }
}

#[derive(Debug)]
pub struct LevelSchema {
    pub level: Level,
    pub fields: &'static [FieldSpec],
    /// Nested groups that are absent unless at least one of their cells is
    /// non-empty (they decode to `None` otherwise).
    pub optional_groups: &'static [&'static str],
}

impl LevelSchema {
    /// Column names in canonical order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.path)
    }

    pub fn field(&self, path: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.path == path)
    }

    /// The optional group a column belongs to, if any.
    pub fn optional_group_of(&self, path: &str) -> Option<&'static str> {
        let (group, _) = path.split_once('.')?;
        self.optional_groups.iter().copied().find(|g| *g == group)
    }
}

use FieldKind::{Bool, Date, Enum, Float, Integer, Tags, Text};

static ORGANIZATION: LevelSchema = LevelSchema {
    level: Level::Organization,
    fields: &[
        field("id", Text, "ORG-0001"),
        field("name", Text, "Acme Holdings"),
        field("description", Text, "Group real-estate owner"),
        field("headquarters", Text, "Mumbai"),
        field("website", Text, "https://acme.example"),
        field("countryCode", Text, "IN"),
    ],
    optional_groups: &[],
};

static PORTFOLIO: LevelSchema = LevelSchema {
    level: Level::Portfolio,
    fields: &[
        field("id", Text, "PF-0001"),
        field("organizationId", Text, "ORG-0001"),
        field("name", Text, "West Region"),
        field("description", Text, "Offices in the western region"),
    ],
    optional_groups: &[],
};

static CAMPUS: LevelSchema = LevelSchema {
    level: Level::Campus,
    fields: &[
        field("id", Text, "CMP-0001"),
        field("portfolioId", Text, "PF-0001"),
        field("name", Text, "HQ Campus"),
        field("city", Text, "Pune"),
        field("address", Text, "Plot 4, Hinjewadi Phase 1"),
        field("gps", Text, "18.5912,73.7389"),
        field("type", Enum(CampusType::TOKENS), "corporate"),
        field("status", Enum(LifecycleStatus::TOKENS), "active"),
        field("parking.twoWheeler", Integer, "300"),
        field("parking.fourWheeler", Integer, "120"),
        field("parking.evCharging", Integer, "12"),
        field("amenities", Tags, "cafeteria,gym"),
        field("greenInfrastructure.hasSolar", Bool, "true"),
        field("greenInfrastructure.hasRainwaterHarvesting", Bool, "true"),
        field("greenInfrastructure.hasSewageTreatment", Bool, "false"),
        field("greenInfrastructure.greenAreaPercentage", Float, "25.5"),
        field("bcpDrAvailable", Bool, "false"),
    ],
    optional_groups: &[],
};

static BUILDING: LevelSchema = LevelSchema {
    level: Level::Building,
    fields: &[
        field("id", Text, "BLD-0001"),
        field("campusId", Text, "CMP-0001"),
        field("name", Text, "Tower A"),
        field("code", Text, "PUN-TA"),
        field("alias", Text, "Main block"),
        field("builtUpArea", Float, "185000"),
        field("rentableArea", Float, "160000"),
        field("carpetArea", Float, "128000"),
        field("floorCount", Integer, "8"),
        field("ownershipType", Enum(OwnershipType::TOKENS), "leased"),
        field("leaseDetails.startDate", Date, "2024-04-01"),
        field("leaseDetails.endDate", Date, "2033-03-31"),
        field("leaseDetails.monthlyRent", Float, "2500000"),
        field("leaseDetails.camCharge", Float, "320000"),
        field("leaseDetails.securityDeposit", Float, "15000000"),
        field("leaseDetails.currency", Text, "INR"),
        field("status", Enum(LifecycleStatus::TOKENS), "active"),
        field("parking.twoWheeler", Integer, "150"),
        field("parking.fourWheeler", Integer, "60"),
        field("parking.evCharging", Integer, "6"),
    ],
    optional_groups: &["leaseDetails"],
};

static FLOOR: LevelSchema = LevelSchema {
    level: Level::Floor,
    fields: &[
        field("id", Text, "FLR-0001"),
        field("buildingId", Text, "BLD-0001"),
        field("floorNumber", Text, "G"),
        field("floorArea", Float, "22000"),
        field("seatCounts.fixedDesk", Integer, "180"),
        field("seatCounts.hotDesk", Integer, "40"),
        field("seatCounts.cafeSeat", Integer, "60"),
        field("seatCounts.meetingRoomSeat", Integer, "48"),
        field("parking.twoWheeler", Integer, "0"),
        field("parking.fourWheeler", Integer, "0"),
        field("parking.evCharging", Integer, "0"),
        field("amenities", Tags, "pantry,wellness room"),
    ],
    optional_groups: &[],
};

static SEAT_ZONE: LevelSchema = LevelSchema {
    level: Level::SeatZone,
    fields: &[
        field("id", Text, "SZ-0001"),
        field("floorId", Text, "FLR-0001"),
        field("name", Text, "Zone A"),
        field("occupancyStatus", Enum(OccupancyStatus::TOKENS), "free"),
    ],
    optional_groups: &[],
};

/// The column schema of a level.
pub fn schema(level: Level) -> &'static LevelSchema {
    match level {
        Level::Organization => &ORGANIZATION,
        Level::Portfolio => &PORTFOLIO,
        Level::Campus => &CAMPUS,
        Level::Building => &BUILDING,
        Level::Floor => &FLOOR,
        Level::SeatZone => &SEAT_ZONE,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_schema_starts_with_id_and_parent() {
        for level in Level::ALL {
            let columns: Vec<_> = schema(level).columns().collect();
            assert_eq!(columns[0], "id");
            if let Some(parent) = level.parent_field() {
                assert_eq!(columns[1], parent, "{level}");
            }
        }
    }

    #[test]
    fn columns_are_unique() {
        for level in Level::ALL {
            let mut seen = HashSet::new();
            for column in schema(level).columns() {
                assert!(seen.insert(column), "{level} repeats {column}");
            }
        }
    }

    #[test]
    fn lease_columns_form_optional_group() {
        let building = schema(Level::Building);
        assert_eq!(
            building.optional_group_of("leaseDetails.monthlyRent"),
            Some("leaseDetails")
        );
        assert_eq!(building.optional_group_of("parking.twoWheeler"), None);
        assert_eq!(building.optional_group_of("name"), None);
    }
}
