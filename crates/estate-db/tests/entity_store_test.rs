//! Integration tests for the SurrealDB entity store using in-memory
//! SurrealDB.

use estate_core::error::EstateError;
use estate_core::models::{
    Building, Campus, Entity, LeaseDetails, Level, Organization, OwnershipType, Portfolio,
};
use estate_core::repository::EntityStore;
use estate_db::SurrealEntityStore;
use serde_json::json;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};

/// Helper: spin up in-memory DB and run migrations.
async fn setup() -> SurrealEntityStore<Db> {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    estate_db::run_migrations(&db).await.unwrap();
    SurrealEntityStore::new(db)
}

fn org(id: &str, name: &str) -> Entity {
    Entity::Organization(Organization {
        id: id.into(),
        name: name.into(),
        country_code: "IN".into(),
        ..Default::default()
    })
}

fn portfolio(id: &str, org_id: &str) -> Entity {
    Entity::Portfolio(Portfolio {
        id: id.into(),
        organization_id: org_id.into(),
        name: format!("Portfolio {id}"),
        ..Default::default()
    })
}

#[tokio::test]
async fn insert_and_select_round_trip() {
    let store = setup().await;

    let inserted = store
        .insert_batch(Level::Organization, vec![org("ORG-1", "Acme")])
        .await
        .unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0], org("ORG-1", "Acme"));

    let all = store.select(Level::Organization).await.unwrap();
    assert_eq!(all, inserted);
}

#[tokio::test]
async fn select_preserves_insertion_order() {
    let store = setup().await;

    store
        .insert_batch(
            Level::Portfolio,
            vec![
                portfolio("PF-C", "ORG-1"),
                portfolio("PF-A", "ORG-1"),
                portfolio("PF-B", "ORG-1"),
            ],
        )
        .await
        .unwrap();
    store
        .insert_batch(Level::Portfolio, vec![portfolio("PF-0", "ORG-1")])
        .await
        .unwrap();

    let ids: Vec<String> = store
        .select(Level::Portfolio)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id().to_string())
        .collect();
    assert_eq!(ids, ["PF-C", "PF-A", "PF-B", "PF-0"]);
}

#[tokio::test]
async fn nested_fields_survive_storage() {
    let store = setup().await;

    let building = Entity::Building(Building {
        id: "BLD-1".into(),
        campus_id: "CMP-1".into(),
        name: "Tower A".into(),
        ownership_type: OwnershipType::Leased,
        lease_details: Some(LeaseDetails {
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 4, 1),
            monthly_rent: 250_000.0,
            currency: "INR".into(),
            ..Default::default()
        }),
        floor_count: 12,
        ..Default::default()
    });

    store
        .insert_batch(Level::Building, vec![building.clone()])
        .await
        .unwrap();

    let stored = store.select(Level::Building).await.unwrap();
    assert_eq!(stored, vec![building]);
}

#[tokio::test]
async fn duplicate_id_rejects_whole_batch() {
    let store = setup().await;

    store
        .insert_batch(Level::Organization, vec![org("ORG-1", "Existing")])
        .await
        .unwrap();

    let result = store
        .insert_batch(
            Level::Organization,
            vec![org("ORG-2", "Fresh"), org("ORG-1", "Clash")],
        )
        .await;
    assert!(result.is_err(), "duplicate id should fail the batch");

    let all = store.select(Level::Organization).await.unwrap();
    assert_eq!(all.len(), 1, "no row of the failed batch may be written");
    assert_eq!(all[0].display_name(), "Existing");
}

#[tokio::test]
async fn update_merges_patch() {
    let store = setup().await;

    let campus = Entity::Campus(Campus {
        id: "CMP-1".into(),
        portfolio_id: "PF-1".into(),
        name: "North".into(),
        ..Default::default()
    });
    store.insert_batch(Level::Campus, vec![campus]).await.unwrap();

    let patch = json!({
        "city": "Pune",
        "greenInfrastructure": { "hasSolar": true }
    })
    .as_object()
    .cloned()
    .unwrap();

    let updated = store.update(Level::Campus, "CMP-1", patch).await.unwrap();
    let Entity::Campus(updated) = updated else {
        panic!("expected campus");
    };
    assert_eq!(updated.name, "North");
    assert_eq!(updated.city, "Pune");
    assert!(updated.green_infrastructure.has_solar);

    let stored = store.select(Level::Campus).await.unwrap();
    assert_eq!(stored, vec![Entity::Campus(updated)]);
}

#[tokio::test]
async fn update_missing_record_is_not_found() {
    let store = setup().await;

    let err = store
        .update(Level::Floor, "FLR-404", Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, EstateError::NotFound { .. }));
}

#[tokio::test]
async fn delete_removes_record() {
    let store = setup().await;

    store
        .insert_batch(Level::Organization, vec![org("ORG-1", "Gone")])
        .await
        .unwrap();
    store.delete(Level::Organization, "ORG-1").await.unwrap();

    assert!(store.select(Level::Organization).await.unwrap().is_empty());
    assert!(store.delete(Level::Organization, "ORG-1").await.is_err());
}
