//! Schema definitions and migration runner for SurrealDB.
//!
//! Each hierarchy level lives in its own SCHEMAFULL table. The level's
//! record is stored as a flexible `body` object next to the indexed
//! `parent_id` and an `ordinal` that preserves insertion order.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "portfolio_hierarchy",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1: one table per hierarchy level
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Organizations (roots, parent_id is always empty)
-- =======================================================================
DEFINE TABLE organization SCHEMAFULL;
DEFINE FIELD parent_id ON TABLE organization TYPE string DEFAULT '';
DEFINE FIELD ordinal ON TABLE organization TYPE int;
DEFINE FIELD body ON TABLE organization TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE organization TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Portfolios (parent: organization)
-- =======================================================================
DEFINE TABLE portfolio SCHEMAFULL;
DEFINE FIELD parent_id ON TABLE portfolio TYPE string;
DEFINE FIELD ordinal ON TABLE portfolio TYPE int;
DEFINE FIELD body ON TABLE portfolio TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE portfolio TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE portfolio TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_portfolio_parent ON TABLE portfolio COLUMNS parent_id;

-- =======================================================================
-- Campuses (parent: portfolio)
-- =======================================================================
DEFINE TABLE campus SCHEMAFULL;
DEFINE FIELD parent_id ON TABLE campus TYPE string;
DEFINE FIELD ordinal ON TABLE campus TYPE int;
DEFINE FIELD body ON TABLE campus TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE campus TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE campus TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_campus_parent ON TABLE campus COLUMNS parent_id;

-- =======================================================================
-- Buildings (parent: campus)
-- =======================================================================
DEFINE TABLE building SCHEMAFULL;
DEFINE FIELD parent_id ON TABLE building TYPE string;
DEFINE FIELD ordinal ON TABLE building TYPE int;
DEFINE FIELD body ON TABLE building TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE building TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE building TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_building_parent ON TABLE building COLUMNS parent_id;

-- =======================================================================
-- Floors (parent: building)
-- =======================================================================
DEFINE TABLE floor SCHEMAFULL;
DEFINE FIELD parent_id ON TABLE floor TYPE string;
DEFINE FIELD ordinal ON TABLE floor TYPE int;
DEFINE FIELD body ON TABLE floor TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE floor TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE floor TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_floor_parent ON TABLE floor COLUMNS parent_id;

-- =======================================================================
-- Seat zones (parent: floor)
-- =======================================================================
DEFINE TABLE seat_zone SCHEMAFULL;
DEFINE FIELD parent_id ON TABLE seat_zone TYPE string;
DEFINE FIELD ordinal ON TABLE seat_zone TYPE int;
DEFINE FIELD body ON TABLE seat_zone TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD created_at ON TABLE seat_zone TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE seat_zone TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_seat_zone_parent ON TABLE seat_zone COLUMNS parent_id;
";

/// Run all pending migrations against the given database.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS
        .iter()
        .filter(|m| m.version > current_version)
    {
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
