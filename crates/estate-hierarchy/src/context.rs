//! Office context resolver.
//!
//! The office context is the organization/portfolio/campus/building (and
//! optionally floor) that other parts of the application are scoped to. It
//! is persisted outside the entity store, and every load has to be checked
//! again against the live hierarchy because any part of the path may have
//! been deleted since it was chosen.
//!
//! A stale path is an expected outcome, not an error: [`resolve`] reports
//! how far the path still resolves and leaves the persisted selection
//! untouched. Callers decide whether to [`clear`](OfficeContextResolver::clear).

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use estate_core::models::{Building, Campus, Floor, Level, Organization, Portfolio};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::HierarchyError;
use crate::tree::Forest;

/// Ids of the selected office, root first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficePath {
    pub organization_id: String,
    pub portfolio_id: String,
    pub campus_id: String,
    pub building_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_id: Option<String>,
}

/// A persisted selection: the path plus the label shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfficeContext {
    pub path: OfficePath,
    pub label: String,
}

impl OfficeContext {
    pub fn new(path: OfficePath, label: impl Into<String>) -> Self {
        Self {
            path,
            label: label.into(),
        }
    }

    /// Build a context whose label comes from the resolved names.
    ///
    /// Returns `None` when the path is stale.
    pub fn from_resolution(path: OfficePath, resolved: &ResolvedOffice<'_>) -> Option<Self> {
        resolved.valid.then(|| Self::new(path, resolved.label()))
    }
}

/// The two observable states of the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextState {
    Unset,
    Set(OfficeContext),
}

/// Outcome of walking an [`OfficePath`] through a forest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOffice<'a> {
    pub valid: bool,
    pub organization: Option<&'a Organization>,
    pub portfolio: Option<&'a Portfolio>,
    pub campus: Option<&'a Campus>,
    pub building: Option<&'a Building>,
    pub floor: Option<&'a Floor>,
    /// First level whose id could not be found.
    pub stale_at: Option<Level>,
}

impl<'a> ResolvedOffice<'a> {
    fn stale(self, level: Level) -> Self {
        Self {
            valid: false,
            stale_at: Some(level),
            ..self
        }
    }

    /// Names of the resolved prefix joined with " / ".
    pub fn label(&self) -> String {
        let floor = self.floor.map(|f| format!("Floor {}", f.floor_number));
        [
            self.organization.map(|o| o.name.as_str()),
            self.portfolio.map(|p| p.name.as_str()),
            self.campus.map(|c| c.name.as_str()),
            self.building.map(|b| b.name.as_str()),
            floor.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" / ")
    }
}

/// Walk `path` top-down through `forest`, stopping at the first id that
/// is not among the current node's children.
pub fn resolve<'a>(path: &OfficePath, forest: &'a Forest) -> ResolvedOffice<'a> {
    let mut resolved = ResolvedOffice {
        valid: true,
        organization: None,
        portfolio: None,
        campus: None,
        building: None,
        floor: None,
        stale_at: None,
    };

    let Some(org) = forest.organization(&path.organization_id) else {
        return resolved.stale(Level::Organization);
    };
    resolved.organization = Some(&org.organization);

    let Some(portfolio) = org
        .portfolios
        .iter()
        .find(|p| p.portfolio.id == path.portfolio_id)
    else {
        return resolved.stale(Level::Portfolio);
    };
    resolved.portfolio = Some(&portfolio.portfolio);

    let Some(campus) = portfolio
        .campuses
        .iter()
        .find(|c| c.campus.id == path.campus_id)
    else {
        return resolved.stale(Level::Campus);
    };
    resolved.campus = Some(&campus.campus);

    let Some(building) = campus
        .buildings
        .iter()
        .find(|b| b.building.id == path.building_id)
    else {
        return resolved.stale(Level::Building);
    };
    resolved.building = Some(&building.building);

    if let Some(floor_id) = &path.floor_id {
        let Some(floor) = building.floors.iter().find(|f| &f.floor.id == floor_id) else {
            return resolved.stale(Level::Floor);
        };
        resolved.floor = Some(&floor.floor);
    }
    resolved
}

/// Client-local storage for the serialized selection.
pub trait ContextStorage: Send + Sync {
    /// The stored text, or `None` when nothing is stored.
    fn read(&self) -> Result<Option<String>, HierarchyError>;
    fn write(&self, contents: &str) -> Result<(), HierarchyError>;
    /// Remove the stored text; removing nothing is not an error.
    fn remove(&self) -> Result<(), HierarchyError>;
}

/// Stores the selection as a JSON file.
#[derive(Debug, Clone)]
pub struct FileContextStorage {
    path: PathBuf,
}

impl FileContextStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> HierarchyError {
    HierarchyError::ContextStorage(format!("{}: {e}", path.display()))
}

impl ContextStorage for FileContextStorage {
    fn read(&self) -> Result<Option<String>, HierarchyError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }

    fn write(&self, contents: &str) -> Result<(), HierarchyError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }
        fs::write(&self.path, contents).map_err(|e| storage_error(&self.path, e))
    }

    fn remove(&self) -> Result<(), HierarchyError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(&self.path, e)),
        }
    }
}

/// Keeps the selection in process memory.
#[derive(Debug, Default)]
pub struct MemoryContextStorage {
    contents: Mutex<Option<String>>,
}

impl MemoryContextStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage preloaded with raw text, which need not be valid.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Mutex::new(Some(contents.into())),
        }
    }
}

impl ContextStorage for MemoryContextStorage {
    fn read(&self) -> Result<Option<String>, HierarchyError> {
        let guard = self.contents.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn write(&self, contents: &str) -> Result<(), HierarchyError> {
        let mut guard = self.contents.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(contents.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<(), HierarchyError> {
        let mut guard = self.contents.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
        Ok(())
    }
}

/// Persists, loads and resolves the current office selection.
pub struct OfficeContextResolver<S: ContextStorage> {
    storage: S,
}

impl<S: ContextStorage> OfficeContextResolver<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Store `context`, replacing any previous selection.
    pub fn persist(&self, context: &OfficeContext) -> Result<(), HierarchyError> {
        let json = serde_json::to_string_pretty(context)
            .map_err(|e| HierarchyError::ContextStorage(e.to_string()))?;
        self.storage.write(&json)?;
        info!(label = %context.label, "Office context saved");
        Ok(())
    }

    /// Load the persisted selection.
    ///
    /// Never fails: missing, unreadable or malformed data all load as
    /// [`ContextState::Unset`].
    pub fn load(&self) -> ContextState {
        let contents = match self.storage.read() {
            Ok(Some(contents)) => contents,
            Ok(None) => return ContextState::Unset,
            Err(e) => {
                warn!(error = %e, "Could not read office context; treating as unset");
                return ContextState::Unset;
            }
        };
        match serde_json::from_str::<OfficeContext>(&contents) {
            Ok(context) => ContextState::Set(context),
            Err(e) => {
                warn!(error = %e, "Malformed office context; treating as unset");
                ContextState::Unset
            }
        }
    }

    pub fn clear(&self) -> Result<(), HierarchyError> {
        self.storage.remove()?;
        info!("Office context cleared");
        Ok(())
    }

    /// Resolve the persisted selection, if there is one.
    ///
    /// A stale result does not clear the selection.
    pub fn resolve_current<'a>(
        &self,
        forest: &'a Forest,
    ) -> Option<(OfficeContext, ResolvedOffice<'a>)> {
        match self.load() {
            ContextState::Unset => None,
            ContextState::Set(context) => {
                let resolved = resolve(&context.path, forest);
                if !resolved.valid {
                    debug!(stale_at = ?resolved.stale_at, "Persisted office no longer resolves");
                }
                Some((context, resolved))
            }
        }
    }
}
