//! Estate Hierarchy: the six-level portfolio hierarchy engine.
//!
//! Organization → Portfolio → Campus → Building → Floor → Seat zone.
//!
//! This crate provides:
//! - Flattened level schemas and the nested-field codec ([`schema`], [`codec`])
//! - The CSV boundary for import, export and templates ([`tabular`])
//! - Referential validation against a snapshot ([`validation`])
//! - The bulk import pipeline with per-row outcomes ([`import`])
//! - Tree building and search over a snapshot ([`tree`], [`search`])
//! - Office context persistence and resolution ([`context`])
//! - A service facade tying these to an entity store ([`HierarchyService`])

pub mod codec;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod import;
pub mod schema;
pub mod search;
pub mod service;
pub mod snapshot;
pub mod tabular;
pub mod tree;
pub mod validation;

pub use codec::{RawRow, decode, encode, template_row};
pub use config::HierarchyConfig;
pub use context::{
    ContextState, ContextStorage, FileContextStorage, MemoryContextStorage, OfficeContext,
    OfficeContextResolver, OfficePath, ResolvedOffice, resolve,
};
pub use error::{HierarchyError, Violation, ViolationKind};
pub use events::{ChangeKind, HierarchyEvent};
pub use import::{BulkImporter, ImportReport, RowFailure};
pub use search::SearchHit;
pub use service::HierarchyService;
pub use snapshot::HierarchySnapshot;
pub use tabular::{parse_csv, template_csv, to_csv_string, write_csv};
pub use tree::{Forest, ForestStats, OrphanWarning, build};
pub use validation::validate_create;
