//! Table definitions for feeds and links

use feedstore_core::datetime::MAX_DATETIME;
use feedstore_core::model::*;
use feedstore_core::sql::{ColumnDef, ColumnType, CreateTable};

/// Width of id, status and feed_id columns
pub const KEY_WIDTH: u32 = 40;
/// Width of name/title/url columns
pub const STRING_WIDTH: u32 = 255;

fn soft_deleted_at() -> ColumnDef {
    ColumnDef::new(COLUMN_SOFT_DELETED_AT, ColumnType::DateTime).default_value(MAX_DATETIME)
}

/// DDL for the feed table
pub fn feed_table(table: &str) -> CreateTable {
    CreateTable::new(table)
        .column(ColumnDef::new(COLUMN_ID, ColumnType::String(KEY_WIDTH)).primary_key())
        .column(ColumnDef::new(COLUMN_STATUS, ColumnType::String(KEY_WIDTH)).nullable())
        .column(ColumnDef::new(COLUMN_NAME, ColumnType::String(STRING_WIDTH)).nullable())
        .column(ColumnDef::new(COLUMN_DESCRIPTION, ColumnType::Text).nullable())
        .column(ColumnDef::new(COLUMN_URL, ColumnType::String(STRING_WIDTH)).nullable())
        .column(ColumnDef::new(COLUMN_FETCH_INTERVAL, ColumnType::Integer).nullable())
        .column(ColumnDef::new(COLUMN_LAST_FETCHED_AT, ColumnType::DateTime).nullable())
        .column(ColumnDef::new(COLUMN_MEMO, ColumnType::Text).nullable())
        .column(ColumnDef::new(COLUMN_CREATED_AT, ColumnType::DateTime).nullable())
        .column(ColumnDef::new(COLUMN_UPDATED_AT, ColumnType::DateTime).nullable())
        .column(soft_deleted_at())
}

/// DDL for the link table
pub fn link_table(table: &str) -> CreateTable {
    CreateTable::new(table)
        .column(ColumnDef::new(COLUMN_ID, ColumnType::String(KEY_WIDTH)).primary_key())
        .column(ColumnDef::new(COLUMN_STATUS, ColumnType::String(KEY_WIDTH)).nullable())
        .column(ColumnDef::new(COLUMN_FEED_ID, ColumnType::String(KEY_WIDTH)).nullable())
        .column(ColumnDef::new(COLUMN_TITLE, ColumnType::String(STRING_WIDTH)).nullable())
        .column(ColumnDef::new(COLUMN_DESCRIPTION, ColumnType::Text).nullable())
        .column(ColumnDef::new(COLUMN_URL, ColumnType::String(STRING_WIDTH)).nullable())
        .column(ColumnDef::new(COLUMN_TIME, ColumnType::DateTime).nullable())
        .column(ColumnDef::new(COLUMN_VOTES_UP, ColumnType::Integer).nullable())
        .column(ColumnDef::new(COLUMN_VOTES_DOWN, ColumnType::Integer).nullable())
        .column(ColumnDef::new(COLUMN_VIEWS, ColumnType::Integer).nullable())
        .column(ColumnDef::new(COLUMN_REPORT, ColumnType::Text).nullable())
        .column(ColumnDef::new(COLUMN_REPORTED_AT, ColumnType::DateTime).nullable())
        .column(ColumnDef::new(COLUMN_CHECKED_AT, ColumnType::DateTime).nullable())
        .column(ColumnDef::new(COLUMN_CREATED_AT, ColumnType::DateTime).nullable())
        .column(ColumnDef::new(COLUMN_UPDATED_AT, ColumnType::DateTime).nullable())
        .column(soft_deleted_at())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(table: &CreateTable) -> Vec<&str> {
        table.columns().iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_tables_cover_every_model_column() {
        assert_eq!(names(&feed_table("feeds")), Feed::columns().to_vec());
        assert_eq!(names(&link_table("links")), Link::columns().to_vec());
    }

    #[test]
    fn test_soft_deleted_at_defaults_to_max_datetime() {
        let sql = feed_table("feeds")
            .to_sql(feedstore_core::Dialect::Sqlite)
            .unwrap();
        assert!(sql.ends_with("\"soft_deleted_at\" DATETIME NOT NULL DEFAULT '9999-12-31 23:59:59')"));
    }
}
