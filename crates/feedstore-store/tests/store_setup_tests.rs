#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{create_test_store, options, setup_test_db, table_exists};
use feedstore_core::errors::ExErrorKind;
use feedstore_store::{Store, StoreOptions};

#[test]
fn test_auto_migrate_creates_tables() {
    let conn = setup_test_db();
    let store = Store::new(
        &conn,
        options("feed_automigrate", "link_automigrate").with_automigrate(false),
    )
    .unwrap();
    assert!(!table_exists(&conn, "feed_automigrate"));

    store.auto_migrate().unwrap();

    assert!(table_exists(&conn, "feed_automigrate"));
    assert!(table_exists(&conn, "link_automigrate"));
}

#[test]
fn test_auto_migrate_is_idempotent() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feeds", "links");

    store.auto_migrate().unwrap();
    store.auto_migrate().unwrap();
}

#[test]
fn test_new_runs_migration_when_enabled() {
    let conn = setup_test_db();
    let _store = create_test_store(&conn, "feed_auto", "link_auto");
    assert!(table_exists(&conn, "feed_auto"));
    assert!(table_exists(&conn, "link_auto"));
}

#[test]
fn test_getters() {
    let conn = setup_test_db();
    let store = create_test_store(&conn, "feed_getters", "link_getters");

    assert_eq!(store.driver_name(), "sqlite");
    assert_eq!(store.feed_table_name(), "feed_getters");
    assert_eq!(store.link_table_name(), "link_getters");
}

#[test]
fn test_empty_driver_name_defaults_to_sqlite() {
    let conn = setup_test_db();
    let store = Store::new(&conn, StoreOptions::default().with_driver_name("")).unwrap();
    assert_eq!(store.driver_name(), "sqlite");
}

#[test]
fn test_enable_debug_toggles() {
    let conn = setup_test_db();
    let mut store = create_test_store(&conn, "feed_debug", "link_debug");

    assert!(!store.is_debug_enabled());
    store.enable_debug(true);
    assert!(store.is_debug_enabled());
    store.enable_debug(false);
    assert!(!store.is_debug_enabled());
}

#[test]
fn test_missing_table_names_are_config_errors() {
    let conn = setup_test_db();

    let err = Store::new(&conn, options("", "links")).err().unwrap();
    assert_eq!(err.kind(), ExErrorKind::Config);
    assert_eq!(err.message(), "feed table name is required");

    let err = Store::new(&conn, options("feeds", "")).err().unwrap();
    assert_eq!(err.message(), "link table name is required");
}

#[test]
fn test_unknown_driver_is_config_error() {
    let conn = setup_test_db();
    let err = Store::new(&conn, StoreOptions::default().with_driver_name("oracle"))
        .err()
        .unwrap();
    assert_eq!(err.kind(), ExErrorKind::Config);
}
