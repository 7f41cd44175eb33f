//! Estate Core: domain models, error types and the entity store contract
//! shared by every crate in the workspace.

pub mod error;
pub mod models;
pub mod repository;
