use std::fs;

use archlens::demo::sample_model;
use archlens::error::{DeserializeErrorKind, NotFoundError, SerializeError, StoreError};
use archlens::model::Model;
use archlens::store::ModelStore;
use pretty_assertions::assert_eq;

#[test]
fn missing_model_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ModelStore::new(dir.path());

    let err = store.load("absent").unwrap_err();
    assert!(matches!(
        err,
        StoreError::NotFound(NotFoundError::Model { ref name, .. }) if name == "absent"
    ));
    assert!(store.current().is_none());
}

#[test]
fn malformed_file_clears_current_model() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ModelStore::new(dir.path());
    store.save(&sample_model("good").unwrap()).unwrap();
    store.load("good").unwrap();
    assert!(store.current().is_some());

    fs::write(store.path_for("broken"), "{ \"model_id\": ").unwrap();
    let err = store.load("broken").unwrap_err();

    match err {
        StoreError::Deserialization(e) => {
            assert!(matches!(e.kind, DeserializeErrorKind::Syntax(_)));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(store.current().is_none());
}

#[test]
fn save_then_load_returns_equal_model() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ModelStore::new(dir.path().join("nested").join("models"));
    let model = sample_model("tower").unwrap();

    let path = store.save(&model).unwrap();
    assert_eq!(path, store.path_for("tower"));

    let loaded = store.load("tower").unwrap();
    assert_eq!(loaded, &model);
    assert_eq!(store.take_current(), Some(model));
    assert!(store.current().is_none());
}

#[test]
fn save_replaces_without_leaving_temporary_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());
    let mut model = sample_model("demo").unwrap();

    store.save(&model).unwrap();
    model.rename("Renamed Building").unwrap();
    store.save(&model).unwrap();

    let entries: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries, vec!["demo.json".to_string()]);
    assert_eq!(store.read("demo").unwrap().name(), "Renamed Building");
}

#[test]
fn list_exists_and_remove() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ModelStore::new(dir.path());
    for id in ["beta", "alpha"] {
        store.save(&sample_model(id).unwrap()).unwrap();
    }
    fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

    assert_eq!(store.list().unwrap(), vec!["alpha", "beta"]);
    assert!(store.exists("alpha"));

    store.load("alpha").unwrap();
    store.remove("alpha").unwrap();
    assert!(!store.exists("alpha"));
    assert!(store.current().is_none());
    assert_eq!(store.list().unwrap(), vec!["beta"]);

    assert!(matches!(
        store.remove("alpha"),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn read_does_not_touch_current() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ModelStore::new(dir.path());
    store.save(&sample_model("a").unwrap()).unwrap();
    store.save(&sample_model("b").unwrap()).unwrap();

    store.load("a").unwrap();
    let other = store.read("b").unwrap();
    assert_eq!(other.id(), "b");
    assert_eq!(store.current().map(|m| m.id()), Some("a"));
}

#[test]
fn names_differing_only_in_punctuation_keep_separate_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());

    store.save(&Model::new("Main Tower", "First").unwrap()).unwrap();
    store.save(&Model::new("Main_Tower", "Second").unwrap()).unwrap();

    let first = store.read("Main Tower").unwrap();
    assert_eq!((first.id(), first.name()), ("Main Tower", "First"));
    let second = store.read("Main_Tower").unwrap();
    assert_eq!((second.id(), second.name()), ("Main_Tower", "Second"));
    assert_eq!(store.list().unwrap(), vec!["Main Tower", "Main_Tower"]);
}

#[test]
fn file_holding_another_model_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = ModelStore::new(dir.path());
    store.save(&sample_model("a").unwrap()).unwrap();
    fs::copy(store.path_for("a"), store.path_for("b")).unwrap();

    match store.load("b").unwrap_err() {
        StoreError::Deserialization(e) => {
            assert!(matches!(
                e.kind,
                DeserializeErrorKind::IdMismatch { ref expected, ref found }
                    if expected == "b" && found == "a"
            ));
            assert_eq!(e.path.to_string(), "$.model_id");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(store.current().is_none());
}

#[test]
fn failed_save_keeps_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = ModelStore::new(dir.path());
    let original = sample_model("demo").unwrap();
    store.save(&original).unwrap();

    let mut broken = original.clone();
    broken
        .get_element_mut("b_001")
        .unwrap()
        .add_property("score", f64::NAN);
    let err = store.save(&broken).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Serialization(SerializeError::NonFiniteNumber { .. })
    ));

    assert_eq!(store.read("demo").unwrap(), original);
    let leftovers: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(".archlens-") || name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "temporary files left: {leftovers:?}");
}
