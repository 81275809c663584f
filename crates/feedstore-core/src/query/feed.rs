use super::{bound, render_select, require_timestamp, CommonFilters};
use crate::datetime;
use crate::errors::{QueryError, Result};
use crate::model::{Entity, Feed, COLUMN_LAST_FETCHED_AT};
use crate::sql::{Dialect, Predicate, SelectStatement, Statement};

const QUERY_NAME: &str = "feed";

/// Query over the feed table
///
/// No limit is applied unless one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedQuery {
    common: CommonFilters,
    last_fetched_at_gte: Option<String>,
    last_fetched_at_lte: Option<String>,
}

impl FeedQuery {
    pub fn new() -> Self {
        Self::default()
    }

    common_filter_accessors!();

    filter_accessors! {
        text last_fetched_at_gte, is_last_fetched_at_gte_set, set_last_fetched_at_gte => last_fetched_at_gte;
        text last_fetched_at_lte, is_last_fetched_at_lte_set, set_last_fetched_at_lte => last_fetched_at_lte;
    }

    /// # Errors
    ///
    /// Returns the first filter that is set to an unusable value.
    pub fn validate(&self) -> std::result::Result<(), QueryError> {
        self.common.validate_identity(QUERY_NAME)?;
        self.common.validate_rest(QUERY_NAME, Feed::columns())?;
        require_timestamp(QUERY_NAME, "last_fetched_at_gte", &self.last_fetched_at_gte)?;
        require_timestamp(QUERY_NAME, "last_fetched_at_lte", &self.last_fetched_at_lte)
    }

    /// Build the SELECT against `table`, with soft-delete checks relative to now
    ///
    /// # Errors
    ///
    /// Fails when validation fails.
    pub fn to_select(&self, table: &str) -> Result<SelectStatement> {
        self.to_select_at(table, &datetime::now_string())
    }

    /// Same as [`FeedQuery::to_select`] with an explicit "now"
    ///
    /// # Errors
    ///
    /// Fails when validation fails.
    pub fn to_select_at(&self, table: &str, now: &str) -> Result<SelectStatement> {
        self.validate()?;

        let mut select = SelectStatement::new(table);
        self.common.push_leading(&mut select);
        self.common.push_updated_range(&mut select);
        if let Some(v) = &self.last_fetched_at_gte {
            select.filter(Predicate::gte(COLUMN_LAST_FETCHED_AT, bound(v)));
        }
        if let Some(v) = &self.last_fetched_at_lte {
            select.filter(Predicate::lte(COLUMN_LAST_FETCHED_AT, bound(v)));
        }
        self.common.push_trailing(&mut select, None, now);
        Ok(select)
    }

    /// Validate and render to SQL; count-only queries render a COUNT
    ///
    /// # Errors
    ///
    /// Fails on validation or statement rendering errors.
    pub fn compile(&self, table: &str, dialect: Dialect) -> Result<Statement> {
        self.compile_at(table, dialect, &datetime::now_string())
    }

    /// # Errors
    ///
    /// Same as [`FeedQuery::compile`].
    pub fn compile_at(&self, table: &str, dialect: Dialect, now: &str) -> Result<Statement> {
        let select = self.to_select_at(table, now)?;
        render_select(QUERY_NAME, &select, self.count_only(), dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    const NOW: &str = "2024-06-01 12:00:00";

    #[test]
    fn test_tri_state_accessors() {
        let q = FeedQuery::new();
        assert!(!q.is_status_set());
        assert_eq!(q.status(), "");
        assert!(!q.is_with_soft_deleted_set());

        let q = q.set_status("").set_with_soft_deleted(false).set_limit(0);
        assert!(q.is_status_set());
        assert_eq!(q.status(), "");
        assert!(q.is_with_soft_deleted_set());
        assert!(!q.with_soft_deleted());
        assert!(q.is_limit_set());
        assert_eq!(q.limit(), 0);
    }

    #[test]
    fn test_empty_query_compiles_to_soft_delete_filter_only() {
        let stmt = FeedQuery::new()
            .compile_at("feeds", Dialect::Sqlite, NOW)
            .unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"feeds\" WHERE \"soft_deleted_at\" > ?"
        );
        assert_eq!(stmt.params, vec![NOW]);
    }

    #[test]
    fn test_predicate_order_is_fixed() {
        let stmt = FeedQuery::new()
            .set_last_fetched_at_lte("2024-05-01 00:00:00")
            .set_updated_at_gte("2024-01-02 00:00:00")
            .set_status_in(["active"])
            .set_id("f1")
            .set_created_at_gte("2024-01-01 00:00:00")
            .compile_at("feeds", Dialect::Sqlite, NOW)
            .unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"feeds\" WHERE \"created_at\" >= ? AND \"id\" = ? \
             AND \"status\" IN (?) AND \"updated_at\" >= ? AND \"last_fetched_at\" <= ? \
             AND \"soft_deleted_at\" > ?"
        );
        assert_eq!(
            stmt.params,
            vec![
                "2024-01-01 00:00:00",
                "f1",
                "active",
                "2024-01-02 00:00:00",
                "2024-05-01 00:00:00",
                NOW
            ]
        );
    }

    #[test]
    fn test_feed_query_has_no_default_limit() {
        let select = FeedQuery::new().to_select_at("feeds", NOW).unwrap();
        assert_eq!(select.limit_value(), None);
    }

    #[test]
    fn test_ordering_and_pagination() {
        let stmt = FeedQuery::new()
            .set_order_by("name")
            .set_order_direction("ASC")
            .set_limit(10)
            .set_offset(20)
            .compile_at("feeds", Dialect::Sqlite, NOW)
            .unwrap();
        assert!(stmt
            .sql
            .ends_with("ORDER BY \"name\" ASC LIMIT 10 OFFSET 20"));

        let stmt = FeedQuery::new()
            .set_order_by("name")
            .compile_at("feeds", Dialect::Sqlite, NOW)
            .unwrap();
        assert!(stmt.sql.ends_with("ORDER BY \"name\" DESC"));
    }

    #[test]
    fn test_count_only_compiles_count() {
        let stmt = FeedQuery::new()
            .set_status("inactive")
            .set_limit(3)
            .set_count_only(true)
            .compile_at("feeds", Dialect::Sqlite, NOW)
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS count FROM \"feeds\" WHERE \"status\" = ? AND \"soft_deleted_at\" > ?"
        );
    }

    #[test]
    fn test_validation_failures() {
        let cases = [
            (FeedQuery::new().set_id(""), "feed query: id cannot be empty"),
            (
                FeedQuery::new().set_id_in(Vec::<String>::new()),
                "feed query: id_in cannot be empty array",
            ),
            (FeedQuery::new().set_status(""), "feed query: status cannot be empty"),
            (FeedQuery::new().set_limit(-1), "feed query: limit cannot be negative"),
            (FeedQuery::new().set_offset(-5), "feed query: offset cannot be negative"),
            (
                FeedQuery::new().set_last_fetched_at_gte(""),
                "feed query: last_fetched_at_gte cannot be empty",
            ),
            (
                FeedQuery::new().set_created_at_gte("3000"),
                "feed query: created_at_gte is not a valid timestamp: \"3000\"",
            ),
            (
                FeedQuery::new().set_last_fetched_at_lte("yesterday"),
                "feed query: last_fetched_at_lte is not a valid timestamp: \"yesterday\"",
            ),
            (
                FeedQuery::new().set_order_by("no_such_column"),
                "feed query: order_by names unknown column \"no_such_column\"",
            ),
        ];

        for (query, message) in cases {
            assert_eq!(query.validate().unwrap_err().to_string(), message);
        }
    }

    #[test]
    fn test_bounds_are_bound_in_storage_format() {
        let stmt = FeedQuery::new()
            .set_created_at_gte("2024-01-01T08:30:00+02:00")
            .set_last_fetched_at_lte("2024-05-01 00:00:00 +0000 UTC")
            .compile_at("feeds", Dialect::Sqlite, NOW)
            .unwrap();
        assert_eq!(
            stmt.params,
            vec!["2024-01-01 06:30:00", "2024-05-01 00:00:00", NOW]
        );
    }

    #[test]
    fn test_order_by_accepts_any_feed_column() {
        for column in Feed::columns() {
            assert!(FeedQuery::new().set_order_by(*column).validate().is_ok(), "{}", column);
        }
    }

    #[test]
    fn test_validation_blocks_compilation() {
        let err = FeedQuery::new()
            .set_limit(-1)
            .compile_at("feeds", Dialect::Sqlite, NOW)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Validation);
    }

    #[test]
    fn test_empty_table_is_sql_build_error() {
        let err = FeedQuery::new()
            .compile_at("", Dialect::Sqlite, NOW)
            .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::SqlBuild);
    }
}
