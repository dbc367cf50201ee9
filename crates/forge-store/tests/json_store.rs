//! Integration tests for the JSON directory store.

use chrono::{TimeZone, Utc};
use tempfile::tempdir;

use forge_model::{ContentKind, ContentRecord, Feature, RecordId};
use forge_store::{ContentStore, JsonDirStore, ListFilter, SortOrder, StoreError};

fn record(kind: ContentKind, name: &str, hour: u32) -> ContentRecord {
    let at = Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap();
    ContentRecord::new_at(kind, at).with_name(name)
}

#[test]
fn records_survive_reopening_the_store() {
    let dir = tempdir().unwrap();
    let mut original = record(ContentKind::Race, "Dragonborn", 1);
    original
        .as_race_mut()
        .unwrap()
        .traits
        .push(Feature::new("Breath Weapon", "Exhale destructive energy."));

    let id = {
        let mut store = JsonDirStore::open(dir.path()).unwrap();
        store.create(&original).unwrap()
    };

    let store = JsonDirStore::open(dir.path()).unwrap();
    assert_eq!(store.read(&id).unwrap(), Some(original));
}

#[test]
fn update_replaces_and_delete_removes() {
    let dir = tempdir().unwrap();
    let mut store = JsonDirStore::open(dir.path()).unwrap();
    let mut saved = record(ContentKind::Class, "Warden", 1);
    let id = store.create(&saved).unwrap();

    saved.description = "Guardians of the old roads.".to_string();
    assert_eq!(store.update(&saved).unwrap(), id);
    assert_eq!(
        store.read(&id).unwrap().unwrap().description,
        "Guardians of the old roads."
    );

    assert!(store.delete(&id).unwrap());
    assert_eq!(store.read(&id).unwrap(), None);
    assert!(matches!(
        store.update(&saved),
        Err(StoreError::UnknownRecord(_))
    ));
}

#[test]
fn list_filters_and_sorts() {
    let dir = tempdir().unwrap();
    let mut store = JsonDirStore::open(dir.path()).unwrap();
    store.create(&record(ContentKind::Race, "Tiefling", 3)).unwrap();
    store.create(&record(ContentKind::Race, "Aasimar", 1)).unwrap();
    store.create(&record(ContentKind::Class, "Artificer", 2)).unwrap();

    let races = store
        .list(&ListFilter::kind(ContentKind::Race), SortOrder::NameAsc)
        .unwrap();
    let names: Vec<_> = races.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Aasimar", "Tiefling"]);

    let newest_first = store
        .list(&ListFilter::default(), SortOrder::UpdatedDesc)
        .unwrap();
    assert_eq!(newest_first[0].name, "Tiefling");

    let filter = ListFilter {
        kind: None,
        name_contains: Some("ART".to_string()),
    };
    let matched = store.list(&filter, SortOrder::NameAsc).unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].name, "Artificer");
}

#[test]
fn ids_that_would_escape_the_directory_are_rejected() {
    let dir = tempdir().unwrap();
    let store = JsonDirStore::open(dir.path()).unwrap();
    let id = RecordId::new("../outside").unwrap();
    assert!(matches!(store.read(&id), Err(StoreError::InvalidId(_))));
}

#[test]
fn corrupt_files_are_reported() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("broken.json"), b"{not json").unwrap();
    let store = JsonDirStore::open(dir.path()).unwrap();
    let id = RecordId::new("broken").unwrap();
    assert!(matches!(store.read(&id), Err(StoreError::Corrupt { .. })));
}
