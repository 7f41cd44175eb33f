use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use estate_db::DbConfig;
use estate_hierarchy::HierarchyConfig;

/// Which entity store backs the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Surreal,
    /// Process-local and empty on every start; useful for checking files.
    Memory,
}

// Binary configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct EstateConfig {
    pub store: StoreKind,
    pub db: DbConfig,
    pub hierarchy: HierarchyConfig,
}

fn var_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

impl EstateConfig {
    pub fn from_env() -> Result<Self> {
        let store = match std::env::var("ESTATE_STORE").as_deref() {
            Err(_) | Ok("surreal") => StoreKind::Surreal,
            Ok("memory") => StoreKind::Memory,
            Ok(other) => bail!("ESTATE_STORE must be 'surreal' or 'memory', got '{other}'"),
        };

        let defaults = DbConfig::default();
        let db = DbConfig {
            url: var_or("ESTATE_DB_URL", defaults.url),
            namespace: var_or("ESTATE_DB_NAMESPACE", defaults.namespace),
            database: var_or("ESTATE_DB_DATABASE", defaults.database),
            username: var_or("ESTATE_DB_USER", defaults.username),
            password: var_or("ESTATE_DB_PASSWORD", defaults.password),
        };

        let mut hierarchy = HierarchyConfig::default();
        if let Ok(path) = std::env::var("ESTATE_CONTEXT_FILE") {
            hierarchy.context_path = PathBuf::from(path);
        }
        if let Ok(limit) = std::env::var("ESTATE_MAX_IMPORT_ROWS") {
            hierarchy.max_import_rows = limit
                .parse()
                .with_context(|| format!("parse ESTATE_MAX_IMPORT_ROWS: {limit}"))?;
        }

        Ok(Self {
            store,
            db,
            hierarchy,
        })
    }
}
