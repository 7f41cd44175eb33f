//! Office context resolution against a live store, and file-backed
//! persistence.

use estate_core::models::{Building, Campus, Entity, Level, Organization, Portfolio};
use estate_db::MemoryEntityStore;
use estate_hierarchy::{
    ContextState, FileContextStorage, HierarchyConfig, HierarchyService, OfficeContext,
    OfficeContextResolver, OfficePath, resolve,
};

async fn seeded() -> HierarchyService<MemoryEntityStore> {
    let service = HierarchyService::new(MemoryEntityStore::new(), HierarchyConfig::default());
    let records = [
        Entity::Organization(Organization {
            id: "org1".into(),
            name: "Acme".into(),
            ..Default::default()
        }),
        Entity::Portfolio(Portfolio {
            id: "portfolio1".into(),
            organization_id: "org1".into(),
            name: "West".into(),
            ..Default::default()
        }),
        Entity::Campus(Campus {
            id: "campus1".into(),
            portfolio_id: "portfolio1".into(),
            name: "HQ".into(),
            ..Default::default()
        }),
        Entity::Building(Building {
            id: "building1".into(),
            campus_id: "campus1".into(),
            name: "Tower A".into(),
            ..Default::default()
        }),
    ];
    for record in records {
        service.create(record).await.unwrap();
    }
    service
}

fn office_path() -> OfficePath {
    OfficePath {
        organization_id: "org1".into(),
        portfolio_id: "portfolio1".into(),
        campus_id: "campus1".into(),
        building_id: "building1".into(),
        floor_id: None,
    }
}

#[tokio::test]
async fn removed_building_makes_path_stale() {
    let service = seeded().await;
    let forest = service.forest().await.unwrap();
    assert!(resolve(&office_path(), &forest).valid);

    service.delete(Level::Building, "building1").await.unwrap();
    let forest = service.forest().await.unwrap();
    let resolved = resolve(&office_path(), &forest);

    assert!(!resolved.valid);
    assert_eq!(resolved.organization.map(|o| o.id.as_str()), Some("org1"));
    assert_eq!(resolved.portfolio.map(|p| p.id.as_str()), Some("portfolio1"));
    assert_eq!(resolved.campus.map(|c| c.id.as_str()), Some("campus1"));
    assert!(resolved.building.is_none());
    assert_eq!(resolved.stale_at, Some(Level::Building));
    assert_eq!(resolved.label(), "Acme / West / HQ");
}

#[tokio::test]
async fn stale_resolution_leaves_selection_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let resolver = OfficeContextResolver::new(FileContextStorage::new(
        dir.path().join("nested").join("office.json"),
    ));
    let service = seeded().await;

    let forest = service.forest().await.unwrap();
    let context =
        OfficeContext::from_resolution(office_path(), &resolve(&office_path(), &forest)).unwrap();
    assert_eq!(context.label, "Acme / West / HQ / Tower A");
    resolver.persist(&context).unwrap();

    service.delete(Level::Building, "building1").await.unwrap();
    let forest = service.forest().await.unwrap();
    let (loaded, resolved) = resolver.resolve_current(&forest).unwrap();
    assert_eq!(loaded, context);
    assert!(!resolved.valid);

    // Still set until the caller clears it.
    assert_eq!(resolver.load(), ContextState::Set(context));
    resolver.clear().unwrap();
    assert_eq!(resolver.load(), ContextState::Unset);
    assert!(!resolver.storage().path().exists());
}

#[test]
fn absent_or_malformed_file_loads_as_unset() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("office.json");
    let resolver = OfficeContextResolver::new(FileContextStorage::new(&path));

    assert_eq!(resolver.load(), ContextState::Unset);
    resolver.clear().unwrap();

    std::fs::write(&path, r#"{"path": {"organizationId": "org1"}}"#).unwrap();
    assert_eq!(resolver.load(), ContextState::Unset);

    std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();
    assert_eq!(resolver.load(), ContextState::Unset);
}

#[test]
fn persisted_file_round_trips_with_floor() {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileContextStorage::new(dir.path().join("office.json"));
    let resolver = OfficeContextResolver::new(storage);

    let mut path = office_path();
    path.floor_id = Some("floor7".into());
    let context = OfficeContext::new(path, "Acme / West / HQ / Tower A / Floor 7");
    resolver.persist(&context).unwrap();

    let reopened = OfficeContextResolver::new(FileContextStorage::new(dir.path().join("office.json")));
    assert_eq!(reopened.load(), ContextState::Set(context));
}
