//! Bulk import pipeline.
//!
//! Imports many rows of one level in two phases. Staging decodes and
//! validates every row against a snapshot taken before the batch; rows that
//! fail are recorded with their 1-based row number and skipped. The staged
//! rows are then written with a single `insert_batch` call. If the store
//! rejects that call, every staged row is reported as failed and nothing
//! counts as imported.

use std::collections::HashSet;
use std::future;

use estate_core::models::{Entity, Level};
use estate_core::repository::EntityStore;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::codec::{RawRow, decode};
use crate::config::HierarchyConfig;
use crate::error::{HierarchyError, Violation, ViolationKind};
use crate::snapshot::HierarchySnapshot;
use crate::validation::{duplicate_id, validate_create};

/// One rejected input row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowFailure {
    /// 1-based data row number; the header row is not counted.
    pub row: usize,
    pub kind: ViolationKind,
    pub field: Option<String>,
    pub reason: String,
}

impl RowFailure {
    fn new(row: usize, violation: Violation) -> Self {
        Self {
            row,
            kind: violation.kind,
            field: violation.field,
            reason: violation.message,
        }
    }
}

/// Per-row outcome of an import.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub level: Level,
    /// Records as stored, in input order.
    pub succeeded: Vec<Entity>,
    /// Rejected rows, ordered by row number.
    pub failed: Vec<RowFailure>,
}

impl ImportReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn summary(&self) -> String {
        format!(
            "{} {} row(s) imported, {} failed",
            self.succeeded.len(),
            self.level,
            self.failed.len()
        )
    }
}

/// Rows that passed validation, waiting for the batch write.
#[derive(Debug, Default)]
struct Staged {
    rows: Vec<usize>,
    records: Vec<Entity>,
    failed: Vec<RowFailure>,
}

pub struct BulkImporter<'a, S> {
    store: &'a S,
    config: &'a HierarchyConfig,
}

impl<'a, S: EntityStore> BulkImporter<'a, S> {
    pub fn new(store: &'a S, config: &'a HierarchyConfig) -> Self {
        Self { store, config }
    }

    /// Reject payloads larger than the configured limit before any row is
    /// looked at.
    pub fn check_row_limit(&self, rows: usize) -> Result<(), HierarchyError> {
        let limit = self.config.max_import_rows;
        if rows > limit {
            return Err(HierarchyError::TooManyRows { rows, limit });
        }
        Ok(())
    }

    /// Import `rows` as records of `level`.
    pub async fn import(
        &self,
        level: Level,
        rows: &[RawRow],
        snapshot: &HierarchySnapshot,
    ) -> Result<ImportReport, HierarchyError> {
        self.import_with_cancel(level, rows, snapshot, future::pending())
            .await
    }

    /// Import `rows`, giving up with [`HierarchyError::Cancelled`] if
    /// `cancel` completes before the batch write returns.
    ///
    /// Staged rows are discarded on cancellation. A write the store has
    /// already committed is not rolled back.
    pub async fn import_with_cancel<F>(
        &self,
        level: Level,
        rows: &[RawRow],
        snapshot: &HierarchySnapshot,
        cancel: F,
    ) -> Result<ImportReport, HierarchyError>
    where
        F: Future<Output = ()>,
    {
        self.check_row_limit(rows.len())?;
        info!(%level, rows = rows.len(), "Starting bulk import");

        let Staged {
            rows: staged_rows,
            records,
            mut failed,
        } = stage(level, rows, snapshot);

        let mut report = ImportReport {
            level,
            succeeded: Vec::new(),
            failed: Vec::new(),
        };

        if !records.is_empty() {
            let staged = records.len();
            tokio::pin!(cancel);
            let written = tokio::select! {
                biased;
                _ = &mut cancel => {
                    warn!(%level, staged, "Bulk import cancelled");
                    return Err(HierarchyError::Cancelled);
                }
                written = self.store.insert_batch(level, records) => written,
            };

            match written {
                Ok(stored) => report.succeeded = stored,
                Err(e) => {
                    warn!(%level, rows = staged_rows.len(), error = %e, "Store rejected import batch");
                    failed.extend(staged_rows.into_iter().map(|row| {
                        RowFailure::new(
                            row,
                            Violation::new(
                                ViolationKind::StoreUnavailable,
                                None,
                                format!("batch write failed: {e}"),
                            ),
                        )
                    }));
                }
            }
        }

        failed.sort_by_key(|f| f.row);
        report.failed = failed;
        info!(
            %level,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Bulk import finished"
        );
        Ok(report)
    }
}

fn stage(level: Level, rows: &[RawRow], snapshot: &HierarchySnapshot) -> Staged {
    let mut staged = Staged::default();
    let mut batch_ids = HashSet::new();

    for (index, raw) in rows.iter().enumerate() {
        let row = index + 1;
        match stage_row(level, raw, snapshot, &mut batch_ids) {
            Ok(record) => {
                staged.rows.push(row);
                staged.records.push(record);
            }
            Err(violation) => {
                debug!(%level, row, kind = ?violation.kind, reason = %violation, "Row rejected");
                staged.failed.push(RowFailure::new(row, violation));
            }
        }
    }
    staged
}

fn stage_row(
    level: Level,
    raw: &RawRow,
    snapshot: &HierarchySnapshot,
    batch_ids: &mut HashSet<String>,
) -> Result<Entity, Violation> {
    let mut record = decode(level, raw)?;
    if record.id().trim().is_empty() {
        record.set_id(level.generate_id());
    }
    validate_create(&record, snapshot)?;
    if !batch_ids.insert(record.id().to_string()) {
        return Err(duplicate_id(&record));
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use estate_core::models::Organization;

    use super::*;

    fn row(cells: &[(&str, &str)]) -> RawRow {
        cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn staging_generates_missing_ids() {
        let staged = stage(
            Level::Organization,
            &[row(&[("name", "Acme")]), row(&[("id", "ORG-7"), ("name", "Globex")])],
            &HierarchySnapshot::default(),
        );
        assert!(staged.failed.is_empty());
        assert!(staged.records[0].id().starts_with("ORG-"));
        assert_eq!(staged.records[1].id(), "ORG-7");
        assert_eq!(staged.rows, vec![1, 2]);
    }

    #[test]
    fn repeated_id_within_batch_is_duplicate() {
        let staged = stage(
            Level::Organization,
            &[
                row(&[("id", "ORG-1"), ("name", "Acme")]),
                row(&[("id", "ORG-1"), ("name", "Acme again")]),
            ],
            &HierarchySnapshot::default(),
        );
        assert_eq!(staged.records.len(), 1);
        assert_eq!(staged.failed.len(), 1);
        assert_eq!(staged.failed[0].row, 2);
        assert_eq!(staged.failed[0].kind, ViolationKind::DuplicateIdentifier);
    }

    #[test]
    fn id_already_stored_is_duplicate() {
        let snapshot = HierarchySnapshot::from_entities([Entity::Organization(Organization {
            id: "ORG-1".into(),
            name: "Acme".into(),
            ..Default::default()
        })]);
        let staged = stage(
            Level::Organization,
            &[row(&[("id", "ORG-1"), ("name", "Acme")])],
            &snapshot,
        );
        assert_eq!(staged.failed[0].kind, ViolationKind::DuplicateIdentifier);
    }

    #[test]
    fn report_summary_counts_rows() {
        let report = ImportReport {
            level: Level::Floor,
            succeeded: Vec::new(),
            failed: vec![RowFailure {
                row: 1,
                kind: ViolationKind::MissingParent,
                field: Some("buildingId".into()),
                reason: "building 'BLD-9' does not exist".into(),
            }],
        };
        assert!(!report.is_clean());
        assert_eq!(report.summary(), "0 floor row(s) imported, 1 failed");
    }
}
