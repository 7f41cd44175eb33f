//! Portfolio domain model.

use serde::{Deserialize, Serialize};

/// A grouping of campuses under an organization (e.g. a region or
/// business unit).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Portfolio {
    pub id: String,
    /// The organization this portfolio belongs to.
    pub organization_id: String,
    pub name: String,
    pub description: String,
}
