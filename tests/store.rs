use interim::core::backing::{BackingMap, MemoryMap, SqliteMap};
use interim::core::store::{self, Store, StoreOptions};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::tempdir;

fn memory_backing() -> Arc<dyn BackingMap> {
    Arc::new(MemoryMap::new())
}

fn open(backing: &Arc<dyn BackingMap>, name: &str) -> Store {
    Store::open(
        Arc::clone(backing),
        StoreOptions {
            name: Some(name.to_string()),
            ..Default::default()
        },
    )
    .expect("store opens")
}

#[test]
fn set_then_get_round_trips() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    let value = json!({"theme": "dark", "page_size": 25, "tags": ["a", "b"], "nested": {"x": null}});
    assert!(store.set("prefs", Some(value.clone())));
    assert_eq!(store.get("prefs"), Some(value));
}

#[test]
fn set_none_behaves_like_delete() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    assert!(store.set("k", Some(json!(1))));
    assert!(store.has("k"));
    assert!(store.set("k", None));
    assert!(!store.has("k"));
    assert_eq!(store.get("k"), None);
}

#[test]
fn absent_key_is_benign_everywhere() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    assert_eq!(store.get("never"), None);
    assert!(!store.has("never"));
    assert!(store.delete("never"));
}

#[test]
fn delete_is_idempotent() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    store.set("k", Some(json!("v")));
    assert!(store.delete("k"));
    assert!(store.delete("k"));
    assert!(!store.has("k"));
}

#[test]
fn has_reports_existence_not_truthiness() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    store.set("null_value", Some(Value::Null));
    store.set("false_value", Some(json!(false)));
    store.set("empty_string", Some(json!("")));
    assert!(store.has("null_value"));
    assert!(store.has("false_value"));
    assert!(store.has("empty_string"));
}

#[test]
fn clear_never_crosses_namespaces() {
    let backing = memory_backing();
    let a = open(&backing, "foo");
    let b = open(&backing, "foo2");

    a.set("k", Some(json!("a-value")));
    b.set("k", Some(json!("b-value")));

    assert!(a.clear());
    assert!(!a.has("k"));
    assert_eq!(b.get("k"), Some(json!("b-value")));
}

#[test]
fn separator_is_reserved_in_qualifiers() {
    let backing = memory_backing();

    // A name like "foo_bar" would produce physical keys starting with "foo_"
    // and collide with the "foo" namespace on clear. Rejected at open.
    let shadowing = Store::open(
        Arc::clone(&backing),
        StoreOptions {
            name: Some("foo_bar".to_string()),
            ..Default::default()
        },
    );
    assert!(shadowing.is_err());

    let bad_cwd = Store::open(
        Arc::clone(&backing),
        StoreOptions {
            name: Some("foo".to_string()),
            cwd: Some("work_dir".to_string()),
            schema: None,
        },
    );
    assert!(bad_cwd.is_err());
}

#[test]
fn cwd_discriminates_otherwise_identical_names() {
    let backing = memory_backing();
    let plain = open(&backing, "config");
    let scoped = Store::open(
        Arc::clone(&backing),
        StoreOptions {
            name: Some("config".to_string()),
            cwd: Some("agency".to_string()),
            schema: None,
        },
    )
    .expect("scoped store opens");

    assert_eq!(plain.prefix(), "config_");
    assert_eq!(scoped.prefix(), "agency_config_");

    plain.set("k", Some(json!(1)));
    scoped.set("k", Some(json!(2)));
    assert_eq!(plain.get("k"), Some(json!(1)));
    assert_eq!(scoped.get("k"), Some(json!(2)));
}

#[test]
fn entries_on_empty_namespace_is_an_empty_map() {
    let backing = memory_backing();
    let store = open(&backing, "empty");
    assert!(store.entries().is_empty());
}

#[test]
fn replace_all_leaves_no_residue() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    store.set("old", Some(json!("stale")));
    assert!(store.replace_all(json!({"a": 1, "b": 2})));

    let entries = store.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries.get("a"), Some(&json!(1)));
    assert_eq!(entries.get("b"), Some(&json!(2)));
    assert!(!store.has("old"));
}

#[test]
fn replace_all_with_non_object_is_a_no_op() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    store.set("kept", Some(json!("value")));
    assert!(store.replace_all(json!([1, 2, 3])));
    assert!(store.replace_all(json!("scalar")));
    assert_eq!(store.get("kept"), Some(json!("value")));
}

#[test]
fn corrupt_raw_value_degrades_gracefully() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    store.set("good", Some(json!({"ok": true})));
    backing
        .write("config_bad", "{not json at all")
        .expect("raw write");

    // Point read: corrupt entry reads as absent.
    assert_eq!(store.get("bad"), None);
    assert!(store.has("bad"));

    // Scan: corrupt entry comes back as the raw string, the rest still parses.
    let entries = store.entries();
    assert_eq!(entries.get("good"), Some(&json!({"ok": true})));
    assert_eq!(entries.get("bad"), Some(&json!("{not json at all")));
}

#[test]
fn size_bytes_counts_serialized_characters() {
    let backing = memory_backing();
    let store = open(&backing, "config");
    let other = open(&backing, "other");

    store.set("n", Some(json!(123))); // "123" -> 3
    store.set("s", Some(json!("abc"))); // "\"abc\"" -> 5
    other.set("big", Some(json!("should not count")));

    assert_eq!(store.size_bytes(), 8);
}

#[test]
fn migrate_and_bridge_are_total_no_ops() {
    let backing = memory_backing();
    let store = open(&backing, "config");

    assert!(store::init_global_bridge());
    assert!(store::init_global_bridge());
    assert!(store.migrate());
}

#[test]
fn schema_option_is_accepted_and_ignored() {
    let backing = memory_backing();
    let store = Store::open(
        Arc::clone(&backing),
        StoreOptions {
            name: Some("config".to_string()),
            cwd: None,
            schema: Some(json!({"type": "object"})),
        },
    )
    .expect("store opens with schema option");

    // Values that would violate the declared schema still store fine.
    assert!(store.set("free_form", Some(json!([1, "two", null]))));
    assert_eq!(store.get("free_form"), Some(json!([1, "two", null])));
}

#[test]
fn default_name_applies_when_omitted() {
    let backing = memory_backing();
    let store =
        Store::open(Arc::clone(&backing), StoreOptions::default()).expect("default store opens");
    assert_eq!(store.name(), "config");
    assert_eq!(store.prefix(), "config_");
}

#[test]
fn sqlite_map_persists_across_reopen() {
    let tmp = tempdir().expect("tempdir");
    let db_path = tmp.path().join("store.db");

    {
        let backing: Arc<dyn BackingMap> =
            Arc::new(SqliteMap::open(&db_path).expect("sqlite open"));
        let store = open(&backing, "employees");
        assert!(store.set("123", Some(json!({"firstName": "Jean"}))));
    }

    let backing: Arc<dyn BackingMap> =
        Arc::new(SqliteMap::open(&db_path).expect("sqlite reopen"));
    let store = open(&backing, "employees");
    assert_eq!(store.get("123"), Some(json!({"firstName": "Jean"})));
}

#[test]
fn employees_end_to_end_scenario() {
    let tmp = tempdir().expect("tempdir");
    let backing: Arc<dyn BackingMap> =
        Arc::new(SqliteMap::open(&tmp.path().join("store.db")).expect("sqlite open"));
    let store = open(&backing, "employees");

    assert!(store.set("123", Some(json!({"firstName": "Jean"}))));
    assert!(store.has("123"));
    assert_eq!(store.get("123"), Some(json!({"firstName": "Jean"})));
    assert!(store.delete("123"));
    assert_eq!(store.get("123"), None);
}

#[test]
fn sqlite_map_isolates_namespaces_like_memory_map() {
    let tmp = tempdir().expect("tempdir");
    let backing: Arc<dyn BackingMap> =
        Arc::new(SqliteMap::open(&tmp.path().join("store.db")).expect("sqlite open"));

    let a = open(&backing, "foo");
    let b = open(&backing, "foo2");
    a.set("k", Some(json!("a")));
    b.set("k", Some(json!("b")));
    a.clear();
    assert!(!a.has("k"));
    assert_eq!(b.get("k"), Some(json!("b")));
}
