use super::{render_select, require_non_empty, CommonFilters};
use crate::datetime;
use crate::errors::{QueryError, Result};
use crate::model::{Entity, Link, COLUMN_FEED_ID, COLUMN_URL};
use crate::sql::{Dialect, Predicate, SelectStatement, Statement};

const QUERY_NAME: &str = "link";

/// Row cap applied to link listings when no limit is set
pub const DEFAULT_LINK_LIMIT: i64 = 1000;

/// Query over the link table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkQuery {
    common: CommonFilters,
    feed_id: Option<String>,
    url: Option<String>,
}

impl LinkQuery {
    pub fn new() -> Self {
        Self::default()
    }

    common_filter_accessors!();

    filter_accessors! {
        text feed_id, is_feed_id_set, set_feed_id => feed_id;
        text url, is_url_set, set_url => url;
    }

    /// # Errors
    ///
    /// Returns the first filter that is set to an unusable value.
    pub fn validate(&self) -> std::result::Result<(), QueryError> {
        self.common.validate_identity(QUERY_NAME)?;
        require_non_empty(QUERY_NAME, "feed_id", &self.feed_id)?;
        require_non_empty(QUERY_NAME, "url", &self.url)?;
        self.common.validate_rest(QUERY_NAME, Link::columns())
    }

    /// # Errors
    ///
    /// Fails when validation fails.
    pub fn to_select(&self, table: &str) -> Result<SelectStatement> {
        self.to_select_at(table, &datetime::now_string())
    }

    /// # Errors
    ///
    /// Fails when validation fails.
    pub fn to_select_at(&self, table: &str, now: &str) -> Result<SelectStatement> {
        self.validate()?;

        let mut select = SelectStatement::new(table);
        self.common.push_leading(&mut select);
        if let Some(v) = &self.feed_id {
            select.filter(Predicate::eq(COLUMN_FEED_ID, v.as_str()));
        }
        if let Some(v) = &self.url {
            select.filter(Predicate::eq(COLUMN_URL, v.as_str()));
        }
        self.common.push_updated_range(&mut select);
        self.common
            .push_trailing(&mut select, Some(DEFAULT_LINK_LIMIT), now);
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
    /// Same as [`LinkQuery::compile`].
    pub fn compile_at(&self, table: &str, dialect: Dialect, now: &str) -> Result<Statement> {
        let select = self.to_select_at(table, now)?;
        render_select(QUERY_NAME, &select, self.count_only(), dialect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2024-06-01 12:00:00";

    #[test]
    fn test_default_limit_applies() {
        let stmt = LinkQuery::new()
            .compile_at("links", Dialect::Sqlite, NOW)
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"links\" WHERE \"soft_deleted_at\" > ? LIMIT 1000"
        );
    }

    #[test]
    fn test_explicit_limit_overrides_default() {
        let select = LinkQuery::new()
            .set_limit(5)
            .to_select_at("links", NOW)
            .unwrap();
        assert_eq!(select.limit_value(), Some(5));

        let select = LinkQuery::new()
            .set_limit(0)
            .to_select_at("links", NOW)
            .unwrap();
        assert_eq!(select.limit_value(), Some(0));
    }

    #[test]
    fn test_cross_reference_filters_follow_status() {
        let stmt = LinkQuery::new()
            .set_updated_at_lte("2024-05-01 00:00:00")
            .set_url("https://example.com/a")
            .set_feed_id("f1")
            .set_status("active")
            .compile_at("links", Dialect::Sqlite, NOW)
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"links\" WHERE \"status\" = ? AND \"feed_id\" = ? AND \"url\" = ? \
             AND \"updated_at\" <= ? AND \"soft_deleted_at\" > ? LIMIT 1000"
        );
    }

    #[test]
    fn test_count_ignores_default_limit() {
        let stmt = LinkQuery::new()
            .set_feed_id("f1")
            .set_count_only(true)
            .compile_at("links", Dialect::Sqlite, NOW)
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS count FROM \"links\" WHERE \"feed_id\" = ? AND \"soft_deleted_at\" > ?"
        );
    }

    #[test]
    fn test_only_soft_deleted() {
        let stmt = LinkQuery::new()
            .set_only_soft_deleted(true)
            .set_with_soft_deleted(false)
            .compile_at("links", Dialect::Sqlite, NOW)
            .unwrap();
        assert!(stmt.sql.contains("\"soft_deleted_at\" <= ?"));
    }

    #[test]
    fn test_empty_feed_id_and_url_are_rejected() {
        let err = LinkQuery::new().set_feed_id("").validate().unwrap_err();
        assert_eq!(err.to_string(), "link query: feed_id cannot be empty");

        let err = LinkQuery::new().set_url("").validate().unwrap_err();
        assert_eq!(err.to_string(), "link query: url cannot be empty");
    }

    #[test]
    fn test_order_by_is_checked_against_link_columns() {
        assert!(LinkQuery::new().set_order_by("votes_up").validate().is_ok());

        // feed-only column
        let err = LinkQuery::new()
            .set_order_by("fetch_interval")
            .validate()
            .unwrap_err();
        assert_eq!(err.filter(), "order_by");
    }
}
