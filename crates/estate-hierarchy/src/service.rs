//! Hierarchy service: the entry point for reads and writes.
//!
//! Every write is validated against a snapshot fetched just before it and
//! announces itself on the event bus once the store accepts it. There is
//! no cached hierarchy; concurrent writers at the same level should be
//! serialized by the caller.

use std::future;
use std::io::Read;

use estate_core::error::EstateError;
use estate_core::models::{Entity, Level, RecordPatch};
use estate_core::repository::EntityStore;
use tokio::sync::broadcast;
use tracing::info;

use crate::codec::{RawRow, encode};
use crate::config::HierarchyConfig;
use crate::error::{HierarchyError, Violation, ViolationKind};
use crate::events::{ChangeKind, EventBus, HierarchyEvent};
use crate::import::{BulkImporter, ImportReport};
use crate::snapshot::HierarchySnapshot;
use crate::tabular::{parse_csv, to_csv_string};
use crate::tree::Forest;
use crate::validation::{validate_create, validate_fields};

/// Hierarchy service.
///
/// Generic over the store implementation so the engine has no dependency
/// on the database crate.
pub struct HierarchyService<S: EntityStore> {
    store: S,
    config: HierarchyConfig,
    events: EventBus,
}

impl<S: EntityStore> HierarchyService<S> {
    pub fn new(store: S, config: HierarchyConfig) -> Self {
        let events = EventBus::new(config.event_capacity);
        Self {
            store,
            config,
            events,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Receive an event after every successful write.
    pub fn subscribe(&self) -> broadcast::Receiver<HierarchyEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> Result<HierarchySnapshot, HierarchyError> {
        Ok(HierarchySnapshot::fetch(&self.store).await?)
    }

    /// Fetch everything and build the forest.
    pub async fn forest(&self) -> Result<Forest, HierarchyError> {
        Ok(self.snapshot().await?.forest())
    }

    /// Validate and store a single record. An empty id is generated.
    pub async fn create(&self, mut entity: Entity) -> Result<Entity, HierarchyError> {
        let level = entity.level();
        if entity.id().trim().is_empty() {
            entity.set_id(level.generate_id());
        }

        let snapshot = self.snapshot().await?;
        validate_create(&entity, &snapshot)
            .map_err(|violation| HierarchyError::Invalid { level, violation })?;

        let stored = self
            .store
            .insert_batch(level, vec![entity])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| EstateError::Internal(format!("store returned no {level} record")))?;

        info!(%level, id = %stored.id(), "Record created");
        self.events
            .publish(level, ChangeKind::Created, vec![stored.id().to_string()]);
        Ok(stored)
    }

    /// Apply a merge patch to one record.
    ///
    /// The patched record is re-validated. Changing the id or the parent
    /// reference is rejected.
    pub async fn update(
        &self,
        level: Level,
        id: &str,
        patch: RecordPatch,
    ) -> Result<Entity, HierarchyError> {
        let snapshot = self.snapshot().await?;
        let current = snapshot
            .get(level, id)
            .ok_or_else(|| HierarchyError::NotFound {
                level,
                id: id.to_string(),
            })?;

        let patched = current.merge_patch(&patch).map_err(|e| HierarchyError::Invalid {
            level,
            violation: Violation::new(ViolationKind::MalformedValue, None, e.to_string()),
        })?;
        if patched.id() != current.id() {
            return Err(HierarchyError::Invalid {
                level,
                violation: Violation::new(
                    ViolationKind::MalformedValue,
                    Some("id"),
                    "id cannot be changed",
                ),
            });
        }
        if patched.parent_id() != current.parent_id() {
            return Err(HierarchyError::ReparentUnsupported {
                level,
                id: id.to_string(),
            });
        }
        validate_fields(&patched).map_err(|violation| HierarchyError::Invalid { level, violation })?;

        let stored = self.store.update(level, id, patch).await?;
        info!(%level, id, "Record updated");
        self.events
            .publish(level, ChangeKind::Updated, vec![id.to_string()]);
        Ok(stored)
    }

    /// Delete a record that has no children.
    pub async fn delete(&self, level: Level, id: &str) -> Result<(), HierarchyError> {
        let snapshot = self.snapshot().await?;
        if !snapshot.contains(level, id) {
            return Err(HierarchyError::NotFound {
                level,
                id: id.to_string(),
            });
        }
        let count = snapshot.count_children(level, id);
        if let (Some(child), true) = (level.child(), count > 0) {
            return Err(HierarchyError::HasChildren {
                level,
                id: id.to_string(),
                child,
                count,
            });
        }

        self.store.delete(level, id).await?;
        info!(%level, id, "Record deleted");
        self.events
            .publish(level, ChangeKind::Deleted, vec![id.to_string()]);
        Ok(())
    }

    /// Import rows of one level against a fresh snapshot.
    pub async fn import(&self, level: Level, rows: &[RawRow]) -> Result<ImportReport, HierarchyError> {
        self.import_with_cancel(level, rows, future::pending()).await
    }

    /// Import rows, stopping with [`HierarchyError::Cancelled`] as soon as
    /// `cancel` completes, whether during the snapshot fetch or the write.
    pub async fn import_with_cancel<F>(
        &self,
        level: Level,
        rows: &[RawRow],
        cancel: F,
    ) -> Result<ImportReport, HierarchyError>
    where
        F: Future<Output = ()>,
    {
        let importer = BulkImporter::new(&self.store, &self.config);
        importer.check_row_limit(rows.len())?;

        tokio::pin!(cancel);
        let snapshot = HierarchySnapshot::fetch_with_cancel(&self.store, &mut cancel).await?;
        let report = importer
            .import_with_cancel(level, rows, &snapshot, &mut cancel)
            .await?;

        if !report.succeeded.is_empty() {
            let ids = report.succeeded.iter().map(|e| e.id().to_string()).collect();
            self.events.publish(level, ChangeKind::Imported, ids);
        }
        Ok(report)
    }

    /// Parse CSV text and import its rows.
    pub async fn import_csv<R: Read>(
        &self,
        level: Level,
        reader: R,
    ) -> Result<ImportReport, HierarchyError> {
        let rows = parse_csv(reader)?;
        self.import(level, &rows).await
    }

    /// All stored records of a level as CSV, in canonical column order.
    pub async fn export(&self, level: Level) -> Result<String, HierarchyError> {
        let records = self.store.select(level).await?;
        let rows = records
            .iter()
            .map(encode)
            .collect::<Result<Vec<_>, _>>()?;
        info!(%level, rows = rows.len(), "Exporting records");
        to_csv_string(level, &rows)
    }
}
