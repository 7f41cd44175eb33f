//! SurrealDB repository implementations.

mod entity;

pub use entity::SurrealEntityStore;
