//! Entity store contract.
//!
//! The hierarchy engine treats this trait as its only persistence boundary.
//! Every call is a single-shot async request with no implicit retry; a
//! failure surfaces immediately to the caller.

use crate::error::EstateResult;
use crate::models::{Entity, Level, RecordPatch};

pub trait EntityStore: Send + Sync {
    /// All records of one level, in insertion order.
    fn select(&self, level: Level) -> impl Future<Output = EstateResult<Vec<Entity>>> + Send;

    /// Insert a batch of records of one level.
    ///
    /// The batch is all-or-nothing: on error nothing is written. Returns the
    /// canonical stored records in input order.
    fn insert_batch(
        &self,
        level: Level,
        records: Vec<Entity>,
    ) -> impl Future<Output = EstateResult<Vec<Entity>>> + Send;

    /// Apply a merge patch to a single record and return the stored result.
    fn update(
        &self,
        level: Level,
        id: &str,
        patch: RecordPatch,
    ) -> impl Future<Output = EstateResult<Entity>> + Send;

    /// Remove a single record. Does not touch children.
    fn delete(&self, level: Level, id: &str) -> impl Future<Output = EstateResult<()>> + Send;
}
