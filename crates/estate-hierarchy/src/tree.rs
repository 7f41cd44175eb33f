//! Hierarchy tree builder.
//!
//! Joins six flat collections into a forest of organizations. Children are
//! grouped by parent id in one pass per level, then nested bottom-up, so a
//! build is linear in the number of records. Children keep their input
//! order under each parent.
//!
//! A record whose parent id is missing from the parent collection is left
//! out of the tree and reported as an [`OrphanWarning`]; the build itself
//! never fails.

use std::collections::{HashMap, HashSet};
use std::fmt;

use estate_core::models::{Building, Campus, Floor, Level, Organization, Portfolio, SeatZone};
use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationNode {
    pub organization: Organization,
    pub portfolios: Vec<PortfolioNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioNode {
    pub portfolio: Portfolio,
    pub campuses: Vec<CampusNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampusNode {
    pub campus: Campus,
    pub buildings: Vec<BuildingNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingNode {
    pub building: Building,
    pub floors: Vec<FloorNode>,
}

impl BuildingNode {
    pub fn total_seats(&self) -> u64 {
        self.floors.iter().map(|f| f.floor.total_seats()).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloorNode {
    pub floor: Floor,
    pub seat_zones: Vec<SeatZone>,
}

/// A record left out of the tree because its parent does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanWarning {
    pub level: Level,
    pub id: String,
    pub parent_id: String,
}

impl fmt::Display for OrphanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parent = self.level.parent().map_or("parent", Level::label);
        write!(
            f,
            "{} {} references missing {} {}",
            self.level.label(),
            self.id,
            parent.to_lowercase(),
            self.parent_id
        )
    }
}

/// Counts per level plus the derived seat total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForestStats {
    pub organizations: usize,
    pub portfolios: usize,
    pub campuses: usize,
    pub buildings: usize,
    pub floors: usize,
    pub seat_zones: usize,
    pub total_seats: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forest {
    pub organizations: Vec<OrganizationNode>,
    /// Orphans, ordered root level first.
    pub warnings: Vec<OrphanWarning>,
}

impl Forest {
    pub fn organization(&self, id: &str) -> Option<&OrganizationNode> {
        self.organizations.iter().find(|o| o.organization.id == id)
    }

    pub fn stats(&self) -> ForestStats {
        let mut stats = ForestStats {
            organizations: self.organizations.len(),
            ..Default::default()
        };
        for org in &self.organizations {
            stats.portfolios += org.portfolios.len();
            for portfolio in &org.portfolios {
                stats.campuses += portfolio.campuses.len();
                for campus in &portfolio.campuses {
                    stats.buildings += campus.buildings.len();
                    for building in &campus.buildings {
                        stats.floors += building.floors.len();
                        stats.total_seats += building.total_seats();
                        stats.seat_zones +=
                            building.floors.iter().map(|f| f.seat_zones.len()).sum::<usize>();
                    }
                }
            }
        }
        stats
    }
}

/// Group `items` by parent id, turning each non-orphan into a node.
///
/// Orphans are recorded in `warnings` and `node` is never called for them.
fn group_by_parent<T, N>(
    level: Level,
    items: &[T],
    parent_ids: &HashSet<&str>,
    id_of: impl Fn(&T) -> &str,
    parent_of: impl Fn(&T) -> &str,
    mut node: impl FnMut(&T) -> N,
    warnings: &mut Vec<OrphanWarning>,
) -> HashMap<String, Vec<N>> {
    let mut groups: HashMap<String, Vec<N>> = HashMap::new();
    for item in items {
        let parent_id = parent_of(item);
        if !parent_ids.contains(parent_id) {
            warnings.push(OrphanWarning {
                level,
                id: id_of(item).to_string(),
                parent_id: parent_id.to_string(),
            });
            continue;
        }
        groups
            .entry(parent_id.to_string())
            .or_default()
            .push(node(item));
    }
    groups
}

/// Build the forest from the six flat collections.
pub fn build(
    organizations: &[Organization],
    portfolios: &[Portfolio],
    campuses: &[Campus],
    buildings: &[Building],
    floors: &[Floor],
    seat_zones: &[SeatZone],
) -> Forest {
    let mut warnings = Vec::new();

    let floor_ids: HashSet<&str> = floors.iter().map(|f| f.id.as_str()).collect();
    let mut zones_by_floor = group_by_parent(
        Level::SeatZone,
        seat_zones,
        &floor_ids,
        |z| z.id.as_str(),
        |z| z.floor_id.as_str(),
        |z| z.clone(),
        &mut warnings,
    );

    let building_ids: HashSet<&str> = buildings.iter().map(|b| b.id.as_str()).collect();
    let mut floors_by_building = group_by_parent(
        Level::Floor,
        floors,
        &building_ids,
        |f| f.id.as_str(),
        |f| f.building_id.as_str(),
        |f| FloorNode {
            floor: f.clone(),
            seat_zones: zones_by_floor.remove(&f.id).unwrap_or_default(),
        },
        &mut warnings,
    );

    let campus_ids: HashSet<&str> = campuses.iter().map(|c| c.id.as_str()).collect();
    let mut buildings_by_campus = group_by_parent(
        Level::Building,
        buildings,
        &campus_ids,
        |b| b.id.as_str(),
        |b| b.campus_id.as_str(),
        |b| BuildingNode {
            building: b.clone(),
            floors: floors_by_building.remove(&b.id).unwrap_or_default(),
        },
        &mut warnings,
    );

    let portfolio_ids: HashSet<&str> = portfolios.iter().map(|p| p.id.as_str()).collect();
    let mut campuses_by_portfolio = group_by_parent(
        Level::Campus,
        campuses,
        &portfolio_ids,
        |c| c.id.as_str(),
        |c| c.portfolio_id.as_str(),
        |c| CampusNode {
            campus: c.clone(),
            buildings: buildings_by_campus.remove(&c.id).unwrap_or_default(),
        },
        &mut warnings,
    );

    let organization_ids: HashSet<&str> = organizations.iter().map(|o| o.id.as_str()).collect();
    let mut portfolios_by_org = group_by_parent(
        Level::Portfolio,
        portfolios,
        &organization_ids,
        |p| p.id.as_str(),
        |p| p.organization_id.as_str(),
        |p| PortfolioNode {
            portfolio: p.clone(),
            campuses: campuses_by_portfolio.remove(&p.id).unwrap_or_default(),
        },
        &mut warnings,
    );

    let organizations = organizations
        .iter()
        .map(|o| OrganizationNode {
            organization: o.clone(),
            portfolios: portfolios_by_org.remove(&o.id).unwrap_or_default(),
        })
        .collect();

    warnings.sort_by_key(|w| w.level);
    for warning in &warnings {
        warn!(
            level = %warning.level,
            id = %warning.id,
            parent_id = %warning.parent_id,
            "Orphaned record left out of hierarchy"
        );
    }

    Forest {
        organizations,
        warnings,
    }
}
