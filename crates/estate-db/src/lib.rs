//! Estate Database: SurrealDB connection management and entity store
//! implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - The SurrealDB-backed store ([`SurrealEntityStore`])
//! - An in-process store for development and tests ([`MemoryEntityStore`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod memory;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use memory::MemoryEntityStore;
pub use repository::SurrealEntityStore;
pub use schema::{run_migrations, schema_v1};
