//! Integration tests for the bulk import pipeline.

use std::collections::BTreeSet;

use estate_core::error::{EstateError, EstateResult};
use estate_core::models::{Campus, Entity, Level, Organization, Portfolio, RecordPatch};
use estate_core::repository::EntityStore;
use estate_db::{MemoryEntityStore, SurrealEntityStore};
use estate_hierarchy::{
    HierarchyConfig, HierarchyError, HierarchyService, RawRow, ViolationKind,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

fn row(cells: &[(&str, &str)]) -> RawRow {
    cells
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Helper: spin up in-memory DB, run migrations, seed one org, portfolio
/// and campus.
async fn setup() -> HierarchyService<SurrealEntityStore<Db>> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    estate_db::run_migrations(&db).await.unwrap();

    let service = HierarchyService::new(SurrealEntityStore::new(db), HierarchyConfig::default());
    seed(&service).await;
    service
}

async fn seed<S: EntityStore>(service: &HierarchyService<S>) {
    service
        .create(Entity::Organization(Organization {
            id: "ORG-1".into(),
            name: "Acme".into(),
            ..Default::default()
        }))
        .await
        .unwrap();
    service
        .create(Entity::Portfolio(Portfolio {
            id: "PF-1".into(),
            organization_id: "ORG-1".into(),
            name: "West".into(),
            ..Default::default()
        }))
        .await
        .unwrap();
    service
        .create(Entity::Campus(Campus {
            id: "CMP-1".into(),
            portfolio_id: "PF-1".into(),
            name: "HQ".into(),
            ..Default::default()
        }))
        .await
        .unwrap();
}

fn building_row(name: &str, campus: &str) -> RawRow {
    row(&[
        ("campusId", campus),
        ("name", name),
        ("ownershipType", "owned"),
        ("floorCount", "4"),
    ])
}

#[tokio::test]
async fn bad_parent_row_fails_alone() {
    let service = setup().await;
    let rows = vec![
        building_row("Tower A", "CMP-1"),
        building_row("Tower B", "CMP-1"),
        building_row("Tower C", "CMP-404"),
        building_row("Tower D", "CMP-1"),
        building_row("Tower E", "CMP-1"),
    ];

    let report = service.import(Level::Building, &rows).await.unwrap();

    assert_eq!(report.succeeded.len(), 4);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].row, 3);
    assert_eq!(report.failed[0].kind, ViolationKind::MissingParent);
    assert_eq!(report.failed[0].field.as_deref(), Some("campusId"));

    let names: Vec<_> = report
        .succeeded
        .iter()
        .map(|e| e.display_name().to_string())
        .collect();
    assert_eq!(names, ["Tower A", "Tower B", "Tower D", "Tower E"]);

    let stored = service.store().select(Level::Building).await.unwrap();
    assert_eq!(stored, report.succeeded);
}

#[tokio::test]
async fn campus_row_decodes_nested_fields() {
    let service = setup().await;
    let rows = vec![row(&[
        ("portfolioId", "PF-1"),
        ("name", "HQ Campus"),
        ("greenInfrastructure.hasSolar", "true"),
        ("greenInfrastructure.greenAreaPercentage", "25.5"),
        ("amenities", "cafeteria,gym"),
    ])];

    let report = service.import(Level::Campus, &rows).await.unwrap();
    assert!(report.is_clean());

    let Entity::Campus(campus) = &report.succeeded[0] else {
        panic!("expected campus");
    };
    assert!(campus.id.starts_with("CMP-"));
    assert!(campus.green_infrastructure.has_solar);
    assert_eq!(campus.green_infrastructure.green_area_percentage, 25.5);
    assert_eq!(
        campus.amenities,
        BTreeSet::from(["cafeteria".to_string(), "gym".to_string()])
    );
}

#[tokio::test]
async fn row_errors_are_collected_in_order() {
    let service = setup().await;
    let rows = vec![
        row(&[("campusId", "CMP-1"), ("name", "Leased, no terms"), ("ownershipType", "leased")]),
        row(&[("campusId", "CMP-1"), ("name", "Odd status"), ("status", "demolished")]),
        row(&[("campusId", "CMP-1"), ("name", "")]),
        row(&[
            ("campusId", "CMP-1"),
            ("name", "Bad date"),
            ("ownershipType", "leased"),
            ("leaseDetails.startDate", "next spring"),
        ]),
    ];

    let report = service.import(Level::Building, &rows).await.unwrap();

    assert!(report.succeeded.is_empty());
    let kinds: Vec<_> = report.failed.iter().map(|f| (f.row, f.kind)).collect();
    assert_eq!(
        kinds,
        [
            (1, ViolationKind::ConditionalFieldMismatch),
            (2, ViolationKind::InvalidEnum),
            (3, ViolationKind::MissingRequiredField),
            (4, ViolationKind::MalformedValue),
        ]
    );
}

#[tokio::test]
async fn csv_import_and_export() {
    let service = setup().await;
    let csv = "id,campusId,name,code,ownershipType,leaseDetails.monthlyRent,leaseDetails.currency\n\
               BLD-1,CMP-1,Tower A,PUN-TA,leased,250000,INR\n\
               BLD-2,CMP-1,Tower B,PUN-TB,owned,,\n";

    let report = service
        .import_csv(Level::Building, csv.as_bytes())
        .await
        .unwrap();
    assert!(report.is_clean(), "{:?}", report.failed);
    assert_eq!(report.summary(), "2 building row(s) imported, 0 failed");

    let exported = service.export(Level::Building).await.unwrap();
    let rows = estate_hierarchy::parse_csv(exported.as_bytes()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], "BLD-1");
    assert_eq!(rows[0]["leaseDetails.monthlyRent"], "250000");
    assert_eq!(rows[0]["leaseDetails.currency"], "INR");
    assert_eq!(rows[1]["leaseDetails.currency"], "");

    // An export re-imported elsewhere reproduces the same records.
    let other = HierarchyService::new(MemoryEntityStore::new(), HierarchyConfig::default());
    seed(&other).await;
    let again = other
        .import_csv(Level::Building, exported.as_bytes())
        .await
        .unwrap();
    assert_eq!(again.succeeded, report.succeeded);
}

#[tokio::test]
async fn duplicate_ids_in_one_batch() {
    let service = setup().await;
    let rows = vec![
        row(&[("id", "BLD-1"), ("campusId", "CMP-1"), ("name", "Tower A")]),
        row(&[("id", "BLD-1"), ("campusId", "CMP-1"), ("name", "Tower A copy")]),
    ];
    let report = service.import(Level::Building, &rows).await.unwrap();
    assert_eq!(report.succeeded.len(), 1);
    assert_eq!(report.failed[0].row, 2);
    assert_eq!(report.failed[0].kind, ViolationKind::DuplicateIdentifier);
}

#[tokio::test]
async fn oversized_payload_is_rejected_up_front() {
    let config = HierarchyConfig {
        max_import_rows: 2,
        ..Default::default()
    };
    let service = HierarchyService::new(MemoryEntityStore::new(), config);
    let rows = vec![row(&[("name", "A")]), row(&[("name", "B")]), row(&[("name", "C")])];

    let err = service.import(Level::Organization, &rows).await.unwrap_err();
    assert!(matches!(err, HierarchyError::TooManyRows { rows: 3, limit: 2 }));
    assert!(service.store().is_empty().await);
}

#[tokio::test]
async fn cancelled_import_writes_nothing() {
    let service = HierarchyService::new(MemoryEntityStore::new(), HierarchyConfig::default());
    let rows = vec![row(&[("name", "Acme")])];

    let err = service
        .import_with_cancel(Level::Organization, &rows, std::future::ready(()))
        .await
        .unwrap_err();

    assert!(matches!(err, HierarchyError::Cancelled));
    assert!(service.store().is_empty().await);
}

/// A store whose reads succeed but whose writes always fail.
struct FailingStore;

impl EntityStore for FailingStore {
    async fn select(&self, _level: Level) -> EstateResult<Vec<Entity>> {
        Ok(Vec::new())
    }

    async fn insert_batch(&self, _level: Level, _records: Vec<Entity>) -> EstateResult<Vec<Entity>> {
        Err(EstateError::StoreUnavailable("connection reset".into()))
    }

    async fn update(&self, level: Level, id: &str, _patch: RecordPatch) -> EstateResult<Entity> {
        Err(EstateError::NotFound {
            entity: level.table().into(),
            id: id.to_string(),
        })
    }

    async fn delete(&self, _level: Level, _id: &str) -> EstateResult<()> {
        Err(EstateError::StoreUnavailable("connection reset".into()))
    }
}

#[tokio::test]
async fn store_failure_fails_every_staged_row() {
    let service = HierarchyService::new(FailingStore, HierarchyConfig::default());
    let mut events = service.subscribe();
    let rows = vec![
        row(&[("name", "Acme")]),
        row(&[("name", "")]),
        row(&[("name", "Globex")]),
    ];

    let report = service.import(Level::Organization, &rows).await.unwrap();

    assert!(report.succeeded.is_empty());
    let kinds: Vec<_> = report.failed.iter().map(|f| (f.row, f.kind)).collect();
    assert_eq!(
        kinds,
        [
            (1, ViolationKind::StoreUnavailable),
            (2, ViolationKind::MissingRequiredField),
            (3, ViolationKind::StoreUnavailable),
        ]
    );
    assert!(report.failed[0].reason.contains("connection reset"));
    assert!(events.try_recv().is_err());
}
