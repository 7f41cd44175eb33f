//! Point-in-time snapshot of the whole hierarchy.
//!
//! A snapshot is immutable once built. Validation, tree building and
//! office resolution all read from one; callers refresh by fetching a new
//! snapshot from the store rather than mutating a shared cache.

use std::collections::{HashMap, HashSet};

use estate_core::error::EstateResult;
use estate_core::models::{Building, Campus, Entity, Floor, Level, Organization, Portfolio, SeatZone};
use estate_core::repository::EntityStore;
use tracing::debug;

use crate::error::HierarchyError;
use crate::tree::{Forest, build};

#[derive(Debug, Clone, Default)]
pub struct HierarchySnapshot {
    organizations: Vec<Organization>,
    portfolios: Vec<Portfolio>,
    campuses: Vec<Campus>,
    buildings: Vec<Building>,
    floors: Vec<Floor>,
    seat_zones: Vec<SeatZone>,
    ids: HashMap<Level, HashSet<String>>,
}

impl HierarchySnapshot {
    pub fn new(
        organizations: Vec<Organization>,
        portfolios: Vec<Portfolio>,
        campuses: Vec<Campus>,
        buildings: Vec<Building>,
        floors: Vec<Floor>,
        seat_zones: Vec<SeatZone>,
    ) -> Self {
        let mut snapshot = Self {
            organizations,
            portfolios,
            campuses,
            buildings,
            floors,
            seat_zones,
            ids: HashMap::new(),
        };
        snapshot.index();
        snapshot
    }

    /// Sort records of any levels into a snapshot, keeping input order
    /// within each level.
    pub fn from_entities(entities: impl IntoIterator<Item = Entity>) -> Self {
        let mut snapshot = Self::default();
        for entity in entities {
            match entity {
                Entity::Organization(e) => snapshot.organizations.push(e),
                Entity::Portfolio(e) => snapshot.portfolios.push(e),
                Entity::Campus(e) => snapshot.campuses.push(e),
                Entity::Building(e) => snapshot.buildings.push(e),
                Entity::Floor(e) => snapshot.floors.push(e),
                Entity::SeatZone(e) => snapshot.seat_zones.push(e),
            }
        }
        snapshot.index();
        snapshot
    }

    /// Read all six levels from the store concurrently.
    pub async fn fetch<S: EntityStore>(store: &S) -> EstateResult<Self> {
        let (organizations, portfolios, campuses, buildings, floors, seat_zones) = tokio::try_join!(
            store.select(Level::Organization),
            store.select(Level::Portfolio),
            store.select(Level::Campus),
            store.select(Level::Building),
            store.select(Level::Floor),
            store.select(Level::SeatZone),
        )?;

        let snapshot = Self::from_entities(
            organizations
                .into_iter()
                .chain(portfolios)
                .chain(campuses)
                .chain(buildings)
                .chain(floors)
                .chain(seat_zones),
        );
        debug!(records = snapshot.total(), "Fetched hierarchy snapshot");
        Ok(snapshot)
    }

    /// Like [`fetch`](Self::fetch), but gives up with
    /// [`HierarchyError::Cancelled`] as soon as `cancel` completes.
    pub async fn fetch_with_cancel<S, F>(store: &S, cancel: F) -> Result<Self, HierarchyError>
    where
        S: EntityStore,
        F: Future<Output = ()>,
    {
        tokio::pin!(cancel);
        tokio::select! {
            biased;
            _ = &mut cancel => Err(HierarchyError::Cancelled),
            result = Self::fetch(store) => Ok(result?),
        }
    }

    fn index(&mut self) {
        let mut ids: HashMap<Level, HashSet<String>> = HashMap::new();
        for level in Level::ALL {
            ids.insert(level, self.entities(level).iter().map(|e| e.id().to_string()).collect());
        }
        self.ids = ids;
    }

    pub fn organizations(&self) -> &[Organization] {
        &self.organizations
    }

    pub fn portfolios(&self) -> &[Portfolio] {
        &self.portfolios
    }

    pub fn campuses(&self) -> &[Campus] {
        &self.campuses
    }

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn floors(&self) -> &[Floor] {
        &self.floors
    }

    pub fn seat_zones(&self) -> &[SeatZone] {
        &self.seat_zones
    }

    /// Whether a record with this id exists at the level.
    pub fn contains(&self, level: Level, id: &str) -> bool {
        self.ids.get(&level).is_some_and(|ids| ids.contains(id))
    }

    pub fn len(&self, level: Level) -> usize {
        self.ids.get(&level).map_or(0, HashSet::len)
    }

    pub fn total(&self) -> usize {
        Level::ALL.iter().map(|level| self.len(*level)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All records of one level as [`Entity`] values, in input order.
    pub fn entities(&self, level: Level) -> Vec<Entity> {
        match level {
            Level::Organization => self.organizations.iter().cloned().map(Entity::from).collect(),
            Level::Portfolio => self.portfolios.iter().cloned().map(Entity::from).collect(),
            Level::Campus => self.campuses.iter().cloned().map(Entity::from).collect(),
            Level::Building => self.buildings.iter().cloned().map(Entity::from).collect(),
            Level::Floor => self.floors.iter().cloned().map(Entity::from).collect(),
            Level::SeatZone => self.seat_zones.iter().cloned().map(Entity::from).collect(),
        }
    }

    pub fn get(&self, level: Level, id: &str) -> Option<Entity> {
        if !self.contains(level, id) {
            return None;
        }
        self.entities(level).into_iter().find(|e| e.id() == id)
    }

    /// Number of direct children of a record.
    pub fn count_children(&self, level: Level, id: &str) -> usize {
        match level {
            Level::Organization => self.portfolios.iter().filter(|p| p.organization_id == id).count(),
            Level::Portfolio => self.campuses.iter().filter(|c| c.portfolio_id == id).count(),
            Level::Campus => self.buildings.iter().filter(|b| b.campus_id == id).count(),
            Level::Building => self.floors.iter().filter(|f| f.building_id == id).count(),
            Level::Floor => self.seat_zones.iter().filter(|z| z.floor_id == id).count(),
            Level::SeatZone => 0,
        }
    }

    /// Join the flat collections into a forest.
    pub fn forest(&self) -> Forest {
        build(
            &self.organizations,
            &self.portfolios,
            &self.campuses,
            &self.buildings,
            &self.floors,
            &self.seat_zones,
        )
    }
}
