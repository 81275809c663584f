#![allow(dead_code)]

use feedstore_store::{db, Store, StoreOptions};
use rusqlite::Connection;

pub fn setup_test_db() -> Connection {
    db::open_in_memory().unwrap()
}

pub fn options(feed_table: &str, link_table: &str) -> StoreOptions {
    StoreOptions::default()
        .with_feed_table_name(feed_table)
        .with_link_table_name(link_table)
}

pub fn create_test_store<'c>(conn: &'c Connection, feed_table: &str, link_table: &str) -> Store<'c> {
    Store::new(conn, options(feed_table, link_table)).unwrap()
}

pub fn table_exists(conn: &Connection, table: &str) -> bool {
    conn.query_row(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
        [table],
        |row| row.get::<_, String>(0),
    )
    .is_ok()
}

/// Order-insensitive comparison of id lists
pub fn same_ids(mut expected: Vec<String>, mut actual: Vec<String>) -> bool {
    expected.sort();
    actual.sort();
    expected == actual
}
