//! Optional-filter queries for feeds and links
//!
//! Every filter is tri-state: unset (ignored), set to an empty/zero value
//! (usually rejected by `validate`), or set to a value (applied). Each filter
//! `x` exposes `is_x_set()`, `x()` (zero value when unset) and a chaining
//! `set_x(..)`.
//!
//! Both queries compile through [`CommonFilters`], which fixes the order in
//! which predicates are attached.

use crate::datetime;
use crate::errors::{ExError, QueryError, Result};
use feedstore_core_types::schema::FIELD_TABLE;
use crate::model::{
    COLUMN_CREATED_AT, COLUMN_ID, COLUMN_SOFT_DELETED_AT, COLUMN_STATUS, COLUMN_UPDATED_AT,
};
use crate::sql::{Dialect, OrderDirection, Predicate, SelectStatement, Statement};

pub const ORDER_ASC: &str = "asc";
pub const ORDER_DESC: &str = "desc";

/// Generates `is_x_set` / `x` / `set_x` for `Option` filter fields
macro_rules! filter_accessors {
    ($($kind:ident $name:ident, $is_set:ident, $set:ident => $($path:ident).+;)*) => {
        $( filter_accessors!(@$kind $name, $is_set, $set, $($path).+); )*
    };
    (@text $name:ident, $is_set:ident, $set:ident, $($path:ident).+) => {
        pub fn $is_set(&self) -> bool {
            self.$($path).+.is_some()
        }

        pub fn $name(&self) -> &str {
            self.$($path).+.as_deref().unwrap_or("")
        }

        pub fn $set(mut self, value: impl Into<String>) -> Self {
            self.$($path).+ = Some(value.into());
            self
        }
    };
    (@list $name:ident, $is_set:ident, $set:ident, $($path:ident).+) => {
        pub fn $is_set(&self) -> bool {
            self.$($path).+.is_some()
        }

        pub fn $name(&self) -> &[String] {
            self.$($path).+.as_deref().unwrap_or(&[])
        }

        pub fn $set<I, S>(mut self, values: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.$($path).+ = Some(values.into_iter().map(Into::into).collect());
            self
        }
    };
    (@flag $name:ident, $is_set:ident, $set:ident, $($path:ident).+) => {
        pub fn $is_set(&self) -> bool {
            self.$($path).+.is_some()
        }

        pub fn $name(&self) -> bool {
            self.$($path).+.unwrap_or(false)
        }

        pub fn $set(mut self, value: bool) -> Self {
            self.$($path).+ = Some(value);
            self
        }
    };
    (@number $name:ident, $is_set:ident, $set:ident, $($path:ident).+) => {
        pub fn $is_set(&self) -> bool {
            self.$($path).+.is_some()
        }

        pub fn $name(&self) -> i64 {
            self.$($path).+.unwrap_or(0)
        }

        pub fn $set(mut self, value: i64) -> Self {
            self.$($path).+ = Some(value);
            self
        }
    };
}

/// Accessors for the filters every query carries, delegating to `self.common`
macro_rules! common_filter_accessors {
    () => {
        filter_accessors! {
            flag count_only, is_count_only_set, set_count_only => common.count_only;
            flag with_soft_deleted, is_with_soft_deleted_set, set_with_soft_deleted => common.with_soft_deleted;
            flag only_soft_deleted, is_only_soft_deleted_set, set_only_soft_deleted => common.only_soft_deleted;
            text id, is_id_set, set_id => common.id;
            list id_in, is_id_in_set, set_id_in => common.id_in;
            text status, is_status_set, set_status => common.status;
            list status_in, is_status_in_set, set_status_in => common.status_in;
            text created_at_gte, is_created_at_gte_set, set_created_at_gte => common.created_at_gte;
            text created_at_lte, is_created_at_lte_set, set_created_at_lte => common.created_at_lte;
            text updated_at_gte, is_updated_at_gte_set, set_updated_at_gte => common.updated_at_gte;
            text updated_at_lte, is_updated_at_lte_set, set_updated_at_lte => common.updated_at_lte;
            number limit, is_limit_set, set_limit => common.limit;
            number offset, is_offset_set, set_offset => common.offset;
            text order_by, is_order_by_set, set_order_by => common.order_by;
            text order_direction, is_order_direction_set, set_order_direction => common.order_direction;
        }
    };
}

// Declared after the macros so they are in textual scope
pub mod feed;
pub mod link;

pub use feed::FeedQuery;
pub use link::LinkQuery;

/// Filters shared by the feed and link queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommonFilters {
    pub count_only: Option<bool>,
    pub with_soft_deleted: Option<bool>,
    pub only_soft_deleted: Option<bool>,
    pub id: Option<String>,
    pub id_in: Option<Vec<String>>,
    pub status: Option<String>,
    pub status_in: Option<Vec<String>>,
    pub created_at_gte: Option<String>,
    pub created_at_lte: Option<String>,
    pub updated_at_gte: Option<String>,
    pub updated_at_lte: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

pub(crate) fn require_non_empty(
    query: &'static str,
    filter: &'static str,
    value: &Option<String>,
) -> Result<(), QueryError> {
    match value {
        Some(v) if v.is_empty() => Err(QueryError::EmptyFilter { query, filter }),
        _ => Ok(()),
    }
}

/// Present bounds must be non-empty and parse as a timestamp
pub(crate) fn require_timestamp(
    query: &'static str,
    filter: &'static str,
    value: &Option<String>,
) -> Result<(), QueryError> {
    require_non_empty(query, filter, value)?;
    match value {
        Some(v) if datetime::parse_datetime(v).is_none() => Err(QueryError::InvalidTimestamp {
            query,
            filter,
            value: v.clone(),
        }),
        _ => Ok(()),
    }
}

/// Bound value as stored, so text comparison in SQL stays chronological
pub(crate) fn bound(value: &str) -> String {
    datetime::canonicalize(value).unwrap_or_else(|| value.to_string())
}

fn require_known_column(
    query: &'static str,
    filter: &'static str,
    value: &Option<String>,
    columns: &[&str],
) -> Result<(), QueryError> {
    match value {
        Some(v) if !columns.contains(&v.as_str()) => Err(QueryError::UnknownColumn {
            query,
            filter,
            column: v.clone(),
        }),
        _ => Ok(()),
    }
}

fn require_non_empty_set(
    query: &'static str,
    filter: &'static str,
    values: &Option<Vec<String>>,
) -> Result<(), QueryError> {
    match values {
        Some(v) if v.is_empty() => Err(QueryError::EmptyInSet { query, filter }),
        _ => Ok(()),
    }
}

fn require_non_negative(
    query: &'static str,
    filter: &'static str,
    value: Option<i64>,
) -> Result<(), QueryError> {
    match value {
        Some(v) if v < 0 => Err(QueryError::Negative { query, filter }),
        _ => Ok(()),
    }
}

impl CommonFilters {
    /// Checks on identity and status filters
    pub fn validate_identity(&self, query: &'static str) -> Result<(), QueryError> {
        require_non_empty(query, "id", &self.id)?;
        require_non_empty_set(query, "id_in", &self.id_in)?;
        require_non_empty(query, "status", &self.status)?;
        require_non_empty_set(query, "status_in", &self.status_in)
    }

    /// Checks on range bounds, ordering and pagination
    ///
    /// `columns` are the columns `order_by` may name.
    pub fn validate_rest(&self, query: &'static str, columns: &[&str]) -> Result<(), QueryError> {
        require_timestamp(query, "created_at_gte", &self.created_at_gte)?;
        require_timestamp(query, "created_at_lte", &self.created_at_lte)?;
        require_timestamp(query, "updated_at_gte", &self.updated_at_gte)?;
        require_timestamp(query, "updated_at_lte", &self.updated_at_lte)?;
        require_non_empty(query, "order_by", &self.order_by)?;
        require_known_column(query, "order_by", &self.order_by, columns)?;
        require_non_negative(query, "limit", self.limit)?;
        require_non_negative(query, "offset", self.offset)
    }

    /// Attach created-at range, identity and status predicates
    pub fn push_leading(&self, select: &mut SelectStatement) {
        if let Some(v) = &self.created_at_gte {
            select.filter(Predicate::gte(COLUMN_CREATED_AT, bound(v)));
        }
        if let Some(v) = &self.created_at_lte {
            select.filter(Predicate::lte(COLUMN_CREATED_AT, bound(v)));
        }
        if let Some(v) = &self.id {
            select.filter(Predicate::eq(COLUMN_ID, v.as_str()));
        }
        if let Some(v) = &self.id_in {
            select.filter(Predicate::in_list(COLUMN_ID, v.iter().cloned()));
        }
        if let Some(v) = &self.status {
            select.filter(Predicate::eq(COLUMN_STATUS, v.as_str()));
        }
        if let Some(v) = &self.status_in {
            select.filter(Predicate::in_list(COLUMN_STATUS, v.iter().cloned()));
        }
    }

    /// Attach the updated-at range
    pub fn push_updated_range(&self, select: &mut SelectStatement) {
        if let Some(v) = &self.updated_at_gte {
            select.filter(Predicate::gte(COLUMN_UPDATED_AT, bound(v)));
        }
        if let Some(v) = &self.updated_at_lte {
            select.filter(Predicate::lte(COLUMN_UPDATED_AT, bound(v)));
        }
    }

    /// Pagination, ordering and soft-delete visibility, in that order
    ///
    /// Pagination and ordering are skipped for count-only queries.
    /// `default_limit` applies when no explicit limit is set.
    pub fn push_trailing(
        &self,
        select: &mut SelectStatement,
        default_limit: Option<i64>,
        now: &str,
    ) {
        let count_only = self.count_only == Some(true);

        if !count_only {
            if let Some(limit) = self.limit.or(default_limit) {
                select.limit(limit);
            }
            if let Some(offset) = self.offset {
                select.offset(offset);
            }
            if let Some(order_by) = &self.order_by {
                let direction =
                    OrderDirection::parse_lenient(self.order_direction.as_deref().unwrap_or(""));
                select.order_by(order_by.as_str(), direction);
            }
        }

        if self.only_soft_deleted == Some(true) {
            select.filter(Predicate::lte(COLUMN_SOFT_DELETED_AT, now));
            return;
        }
        if self.with_soft_deleted == Some(true) {
            return;
        }
        select.filter(Predicate::gt(COLUMN_SOFT_DELETED_AT, now));
    }
}

/// Render a compiled select, as a COUNT when `count_only` is set
pub(crate) fn render_select(
    query: &'static str,
    select: &SelectStatement,
    count_only: bool,
    dialect: Dialect,
) -> Result<Statement> {
    let rendered = if count_only {
        select.to_count_sql(dialect)
    } else {
        select.to_sql(dialect)
    };
    let statement = rendered.map_err(|e| ExError::from(e).with_table(select.table()))?;
    tracing::debug!(
        query,
        { FIELD_TABLE } = select.table(),
        dialect = dialect.name(),
        predicates = select.predicates().len(),
        count_only,
        "compiled query"
    );
    Ok(statement)
}
