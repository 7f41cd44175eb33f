//! Hierarchy engine configuration.

use std::path::PathBuf;

/// Configuration for the hierarchy service.
#[derive(Debug, Clone)]
pub struct HierarchyConfig {
    /// Upper bound on rows accepted by a single import (default: 10 000).
    /// Larger payloads are rejected before any row is processed.
    pub max_import_rows: usize,
    /// Buffer size of the change-event channel (default: 64).
    pub event_capacity: usize,
    /// Where the selected office is persisted between sessions.
    pub context_path: PathBuf,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            max_import_rows: 10_000,
            event_capacity: 64,
            context_path: PathBuf::from("estate-office.json"),
        }
    }
}
