//! SurrealDB implementation of [`EntityStore`].

use chrono::Utc;
use estate_core::error::EstateResult;
use estate_core::models::{Entity, Level, RecordPatch};
use estate_core::repository::EntityStore;
use serde_json::{Value, json};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::debug;

use crate::error::DbError;

/// DB-side row struct for queries where the id is already known.
#[derive(Debug, SurrealValue)]
struct EntityRow {
    body: serde_json::Value,
}

/// DB-side row struct that includes the record id via `meta::id(id)`.
#[derive(Debug, SurrealValue)]
struct EntityRowWithId {
    record_id: String,
    body: serde_json::Value,
    #[allow(dead_code)]
    ordinal: i64,
}

impl EntityRowWithId {
    fn try_into_entity(self, level: Level) -> Result<Entity, DbError> {
        decode_body(level, &self.record_id, self.body)
    }
}

/// The stored body is authoritative except for its `id`, which always
/// mirrors the record id.
fn decode_body(level: Level, id: &str, mut body: Value) -> Result<Entity, DbError> {
    if let Value::Object(fields) = &mut body {
        fields.insert("id".into(), Value::String(id.to_string()));
    }
    Entity::from_value(level, body)
        .map_err(|e| DbError::Decode(format!("{level} {id}: {e}")))
}

/// SurrealDB implementation of the entity store.
///
/// Records of each level live in the table named by [`Level::table`],
/// keyed by the record's string id.
#[derive(Clone)]
pub struct SurrealEntityStore<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealEntityStore<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn get(&self, level: Level, id: &str) -> Result<Entity, DbError> {
        let query = format!("SELECT body FROM type::record('{}', $id)", level.table());
        let mut result = self.db.query(query).bind(("id", id.to_string())).await?;

        let rows: Vec<EntityRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: level.table().into(),
            id: id.to_string(),
        })?;

        decode_body(level, id, row.body)
    }
}

impl<C: Connection> EntityStore for SurrealEntityStore<C> {
    async fn select(&self, level: Level) -> EstateResult<Vec<Entity>> {
        let query = format!(
            "SELECT meta::id(id) AS record_id, body, ordinal \
             FROM {} ORDER BY ordinal ASC",
            level.table()
        );
        let mut result = self.db.query(query).await.map_err(DbError::from)?;

        let rows: Vec<EntityRowWithId> = result.take(0).map_err(DbError::from)?;
        let entities = rows
            .into_iter()
            .map(|row| row.try_into_entity(level))
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(entities)
    }

    async fn insert_batch(&self, level: Level, records: Vec<Entity>) -> EstateResult<Vec<Entity>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let base = Utc::now().timestamp_micros() * 1000;
        let mut ids = Vec::with_capacity(records.len());
        let mut rows = Vec::with_capacity(records.len());
        for (offset, record) in records.iter().enumerate() {
            ids.push(record.id().to_string());
            rows.push(json!({
                "id": record.id(),
                "parent_id": record.parent_id().unwrap_or_default(),
                "ordinal": base + offset as i64,
                "body": record.to_value()?,
            }));
        }

        // One transaction per batch: a single failing CREATE (e.g. an id
        // that already exists) cancels every row.
        let table = level.table();
        let query = format!(
            "BEGIN TRANSACTION; \
             FOR $row IN $rows {{ \
                 CREATE type::record('{table}', $row.id) SET \
                 parent_id = $row.parent_id, ordinal = $row.ordinal, \
                 body = $row.body; \
             }}; \
             COMMIT TRANSACTION;"
        );

        self.db
            .query(query)
            .bind(("rows", Value::Array(rows)))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        debug!(level = %level, count = ids.len(), "Inserted batch");

        let mut result = self
            .db
            .query(format!(
                "SELECT meta::id(id) AS record_id, body, ordinal \
                 FROM {table} WHERE meta::id(id) IN $ids ORDER BY ordinal ASC"
            ))
            .bind(("ids", ids))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<EntityRowWithId> = result.take(0).map_err(DbError::from)?;
        let entities = rows
            .into_iter()
            .map(|row| row.try_into_entity(level))
            .collect::<Result<Vec<_>, DbError>>()?;

        Ok(entities)
    }

    async fn update(&self, level: Level, id: &str, patch: RecordPatch) -> EstateResult<Entity> {
        let current = self.get(level, id).await?;
        let mut patched = current.merge_patch(&patch)?;
        patched.set_id(id);

        let query = format!(
            "UPDATE type::record('{}', $id) SET \
             body = $body, parent_id = $parent_id, updated_at = time::now()",
            level.table()
        );
        self.db
            .query(query)
            .bind(("id", id.to_string()))
            .bind(("body", patched.to_value()?))
            .bind(("parent_id", patched.parent_id().unwrap_or_default().to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(patched)
    }

    async fn delete(&self, level: Level, id: &str) -> EstateResult<()> {
        self.get(level, id).await?;

        self.db
            .query(format!("DELETE type::record('{}', $id)", level.table()))
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        Ok(())
    }
}
