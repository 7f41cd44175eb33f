//! Organization domain model.
//!
//! Organizations are the roots of the hierarchy. They own portfolios and
//! have no parent reference.

use serde::{Deserialize, Serialize};

/// A company or legal entity owning one or more real-estate portfolios.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Organization {
    pub id: String,
    /// Display name; must be non-empty.
    pub name: String,
    pub description: String,
    pub headquarters: String,
    pub website: String,
    /// ISO 3166 alpha-2 country code (e.g. `IN`).
    pub country_code: String,
}
