//! Forest search.
//!
//! Case-insensitive substring matching over the display fields of every
//! node. Each hit carries its full ancestor path so a caller can turn it
//! straight into an office selection.

use estate_core::models::Level;
use serde::Serialize;

use crate::context::OfficePath;
use crate::tree::Forest;

/// Ids from the root down to (and including) a matched node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AncestorPath {
    pub organization_id: String,
    pub portfolio_id: Option<String>,
    pub campus_id: Option<String>,
    pub building_id: Option<String>,
    pub floor_id: Option<String>,
    pub seat_zone_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchHit {
    pub level: Level,
    pub id: String,
    pub name: String,
    pub path: AncestorPath,
    /// Names from the root down, joined with " / ".
    pub label: String,
}

impl SearchHit {
    /// The office this hit selects, if it is deep enough to name a building.
    ///
    /// Seat-zone hits select their floor.
    pub fn office_path(&self) -> Option<OfficePath> {
        let path = &self.path;
        Some(OfficePath {
            organization_id: path.organization_id.clone(),
            portfolio_id: path.portfolio_id.clone()?,
            campus_id: path.campus_id.clone()?,
            building_id: path.building_id.clone()?,
            floor_id: path.floor_id.clone(),
        })
    }
}

fn matches(needle: &str, haystacks: &[&str]) -> bool {
    haystacks
        .iter()
        .any(|h| !h.is_empty() && h.to_lowercase().contains(needle))
}

fn join(names: &[&str]) -> String {
    names.join(" / ")
}

impl Forest {
    /// Find nodes whose names (or building code/alias, floor number, campus
    /// city) contain `query`, in tree order. A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        let mut hits = Vec::new();
        if needle.is_empty() {
            return hits;
        }

        for org_node in &self.organizations {
            let org = &org_node.organization;
            let mut path = AncestorPath {
                organization_id: org.id.clone(),
                ..Default::default()
            };
            if matches(&needle, &[&org.name]) {
                hits.push(hit(Level::Organization, &org.id, &org.name, &path, &[&org.name]));
            }

            for pf_node in &org_node.portfolios {
                let pf = &pf_node.portfolio;
                path.portfolio_id = Some(pf.id.clone());
                if matches(&needle, &[&pf.name]) {
                    hits.push(hit(
                        Level::Portfolio,
                        &pf.id,
                        &pf.name,
                        &path,
                        &[&org.name, &pf.name],
                    ));
                }

                for campus_node in &pf_node.campuses {
                    let campus = &campus_node.campus;
                    path.campus_id = Some(campus.id.clone());
                    let names: [&str; 3] = [&org.name, &pf.name, &campus.name];
                    if matches(&needle, &[&campus.name, &campus.city]) {
                        hits.push(hit(Level::Campus, &campus.id, &campus.name, &path, &names));
                    }

                    for building_node in &campus_node.buildings {
                        let building = &building_node.building;
                        path.building_id = Some(building.id.clone());
                        let names: [&str; 4] = [names[0], names[1], names[2], &building.name];
                        if matches(&needle, &[&building.name, &building.code, &building.alias]) {
                            hits.push(hit(
                                Level::Building,
                                &building.id,
                                &building.name,
                                &path,
                                &names,
                            ));
                        }

                        for floor_node in &building_node.floors {
                            let floor = &floor_node.floor;
                            path.floor_id = Some(floor.id.clone());
                            let floor_name = format!("Floor {}", floor.floor_number);
                            let names: [&str; 5] = [names[0], names[1], names[2], names[3], &floor_name];
                            if matches(&needle, &[&floor.floor_number]) {
                                hits.push(hit(
                                    Level::Floor,
                                    &floor.id,
                                    &floor_name,
                                    &path,
                                    &names,
                                ));
                            }

                            for zone in &floor_node.seat_zones {
                                if matches(&needle, &[&zone.name]) {
                                    path.seat_zone_id = Some(zone.id.clone());
                                    let names: [&str; 6] =
                                        [names[0], names[1], names[2], names[3], names[4], &zone.name];
                                    hits.push(hit(
                                        Level::SeatZone,
                                        &zone.id,
                                        &zone.name,
                                        &path,
                                        &names,
                                    ));
                                    path.seat_zone_id = None;
                                }
                            }
                        }
                        path.floor_id = None;
                    }
                    path.building_id = None;
                }
                path.campus_id = None;
            }
        }
        hits
    }
}

fn hit(level: Level, id: &str, name: &str, path: &AncestorPath, names: &[&str]) -> SearchHit {
    SearchHit {
        level,
        id: id.to_string(),
        name: name.to_string(),
        path: path.clone(),
        label: join(names),
    }
}
