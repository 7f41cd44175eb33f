//! In-memory implementation of the entity store.
//!
//! Records are held per level in insertion order behind a
//! `tokio::sync::RwLock`, so the store can be cloned and shared across
//! tasks. Nothing is durable; state is lost when the process exits. Used
//! for local runs without a database and by tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use estate_core::error::{EstateError, EstateResult};
use estate_core::models::{Entity, Level, RecordPatch};
use estate_core::repository::EntityStore;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Default)]
pub struct MemoryEntityStore {
    tables: Arc<RwLock<HashMap<Level, Vec<Entity>>>>,
}

impl MemoryEntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of records across all levels.
    pub async fn len(&self) -> usize {
        self.tables.read().await.values().map(Vec::len).sum()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn not_found(level: Level, id: &str) -> EstateError {
    EstateError::NotFound {
        entity: level.table().into(),
        id: id.to_string(),
    }
}

impl EntityStore for MemoryEntityStore {
    async fn select(&self, level: Level) -> EstateResult<Vec<Entity>> {
        let tables = self.tables.read().await;
        Ok(tables.get(&level).cloned().unwrap_or_default())
    }

    async fn insert_batch(&self, level: Level, records: Vec<Entity>) -> EstateResult<Vec<Entity>> {
        let mut tables = self.tables.write().await;
        let table = tables.entry(level).or_default();

        // Check the whole batch before writing anything.
        let mut seen: HashSet<&str> = table.iter().map(Entity::id).collect();
        for record in &records {
            if record.level() != level {
                return Err(EstateError::Validation {
                    message: format!("{} record in a {level} batch", record.level()),
                });
            }
            if !seen.insert(record.id()) {
                return Err(EstateError::AlreadyExists {
                    entity: level.table().into(),
                    id: record.id().to_string(),
                });
            }
        }

        table.extend(records.iter().cloned());
        Ok(records)
    }

    async fn update(&self, level: Level, id: &str, patch: RecordPatch) -> EstateResult<Entity> {
        let mut tables = self.tables.write().await;
        let record = tables
            .get_mut(&level)
            .and_then(|table| table.iter_mut().find(|e| e.id() == id))
            .ok_or_else(|| not_found(level, id))?;

        let mut patched = record.merge_patch(&patch)?;
        patched.set_id(id);
        *record = patched.clone();
        Ok(patched)
    }

    async fn delete(&self, level: Level, id: &str) -> EstateResult<()> {
        let mut tables = self.tables.write().await;
        let table = tables.get_mut(&level).ok_or_else(|| not_found(level, id))?;
        let position = table
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| not_found(level, id))?;
        table.remove(position);
        Ok(())
    }
}
