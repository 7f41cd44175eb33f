//! Domain models for the real-estate portfolio hierarchy.
//!
//! Six levels form a strict tree: Organization → Portfolio → Campus →
//! Building → Floor → Seat-Zone. Every record serializes with camelCase
//! field names, which are also the column names used by tabular import.

pub mod building;
pub mod campus;
pub mod common;
pub mod entity;
pub mod floor;
pub mod level;
pub mod organization;
pub mod portfolio;
pub mod seat_zone;

pub use building::{Building, LeaseDetails, OwnershipType};
pub use campus::{Campus, CampusType, GreenInfrastructure};
pub use common::{LifecycleStatus, Parking};
pub use entity::{Entity, RecordPatch};
pub use floor::{Floor, SeatCounts};
pub use level::Level;
pub use organization::Organization;
pub use portfolio::Portfolio;
pub use seat_zone::{OccupancyStatus, SeatZone};
