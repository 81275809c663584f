//! Store façade: CRUD, soft delete, counting and pagination for feeds and links
//!
//! ## Logging Ownership
//!
//! Every public operation logs `start` and then `end` or `end_error`. The
//! private helpers below them use only `tracing::debug!()`, plus the SQL echo
//! when debug is enabled.

use std::time::Instant;

use feedstore_core::datetime;
use feedstore_core::model::{
    Entity, Feed, Link, COLUMN_CREATED_AT, COLUMN_ID, COLUMN_SOFT_DELETED_AT, COLUMN_UPDATED_AT,
};
use feedstore_core::query::{FeedQuery, LinkQuery};
use feedstore_core::sql::{
    DeleteStatement, Dialect, InsertStatement, Predicate, Statement, UpdateStatement,
};
use feedstore_core::{log_op_end, log_op_error, log_op_start};
use feedstore_core_types::schema::{
    EVENT_SQL, FIELD_ENTITY_ID, FIELD_ENTITY_KIND, FIELD_EVENT, FIELD_PARAM_COUNT,
    FIELD_ROWS_AFFECTED, FIELD_ROW_COUNT, FIELD_SQL, FIELD_TABLE,
};
use rusqlite::{params_from_iter, Connection, OptionalExtension};

use crate::config::{StoreOptions, DEFAULT_DRIVER};
use crate::errors::{config_error, from_rusqlite, invalid_input, not_found, Result};
use crate::hydration::row_to_record;
use crate::schema;

/// Persistence façade over a caller-owned connection
///
/// The store never opens or closes the connection. Calls are synchronous and
/// issue their statements one after another; nothing is wrapped in a
/// transaction.
pub struct Store<'conn> {
    conn: &'conn Connection,
    options: StoreOptions,
    dialect: Dialect,
}

impl<'conn> Store<'conn> {
    /// Create a store, creating missing tables when `automigrate` is set
    ///
    /// # Errors
    ///
    /// - `Config`: a table name is empty or the driver name is unknown
    /// - `Persistence`: auto-migration failed
    pub fn new(conn: &'conn Connection, mut options: StoreOptions) -> Result<Self> {
        if options.feed_table_name.is_empty() {
            return Err(config_error("feed table name is required"));
        }
        if options.link_table_name.is_empty() {
            return Err(config_error("link table name is required"));
        }
        if options.driver_name.is_empty() {
            options.driver_name = DEFAULT_DRIVER.to_string();
        }
        let dialect = Dialect::from_driver_name(&options.driver_name)?;

        let store = Self {
            conn,
            options,
            dialect,
        };
        if store.options.automigrate {
            store.auto_migrate()?;
        }
        Ok(store)
    }

    pub fn driver_name(&self) -> &str {
        &self.options.driver_name
    }

    pub fn feed_table_name(&self) -> &str {
        &self.options.feed_table_name
    }

    pub fn link_table_name(&self) -> &str {
        &self.options.link_table_name
    }

    /// Toggle echoing of generated SQL at info level
    pub fn enable_debug(&mut self, debug: bool) {
        self.options.debug = debug;
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.options.debug
    }

    /// Create both tables if they do not exist
    ///
    /// # Errors
    ///
    /// Returns the DDL failure as a `Persistence` error.
    pub fn auto_migrate(&self) -> Result<()> {
        self.logged("auto_migrate", self.feed_table_name(), || {
            for ddl in [
                schema::feed_table(self.feed_table_name()),
                schema::link_table(self.link_table_name()),
            ] {
                let sql = ddl.to_sql(self.dialect)?;
                self.echo(&sql, 0);
                self.conn.execute_batch(&sql).map_err(from_rusqlite)?;
            }
            Ok(())
        })
    }

    // ---------- feeds ----------

    /// Insert a new feed, stamping `created_at` and `updated_at`
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id; database errors propagate.
    pub fn feed_create(&self, feed: &mut Feed) -> Result<()> {
        self.logged("feed_create", self.feed_table_name(), || {
            self.create_entity("feed_create", self.feed_table_name(), feed)
        })
    }

    /// # Errors
    ///
    /// `InvalidInput` for an empty id; database errors propagate.
    pub fn feed_find_by_id(&self, id: &str) -> Result<Option<Feed>> {
        self.logged("feed_find_by_id", self.feed_table_name(), || {
            self.find_feed("feed_find_by_id", id)
        })
    }

    /// # Errors
    ///
    /// Validation and database errors propagate; nothing is returned partially.
    pub fn feed_list(&self, query: &FeedQuery) -> Result<Vec<Feed>> {
        self.logged("feed_list", self.feed_table_name(), || {
            let statement = query.compile(self.feed_table_name(), self.dialect)?;
            self.fetch(&statement)
        })
    }

    /// Count feeds matching `query`, or all visible feeds when `None`
    ///
    /// # Errors
    ///
    /// Validation and database errors propagate.
    pub fn feed_count(&self, query: Option<FeedQuery>) -> Result<i64> {
        self.logged("feed_count", self.feed_table_name(), || {
            let query = query.unwrap_or_default().set_count_only(true);
            let statement = query.compile(self.feed_table_name(), self.dialect)?;
            self.fetch_count(&statement)
        })
    }

    /// Persist the feed's dirty columns
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id; database errors propagate and leave
    /// the feed dirty.
    pub fn feed_update(&self, feed: &mut Feed) -> Result<()> {
        self.logged("feed_update", self.feed_table_name(), || {
            self.update_entity("feed_update", self.feed_table_name(), feed)
        })
    }

    /// Hard delete
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id; a missing row is not an error.
    pub fn feed_delete(&self, feed: &Feed) -> Result<()> {
        self.logged("feed_delete", self.feed_table_name(), || {
            self.delete_by_id("feed_delete", self.feed_table_name(), feed.entity_id())
        })
    }

    /// # Errors
    ///
    /// `InvalidInput` for an empty id; a missing row is not an error.
    pub fn feed_delete_by_id(&self, id: &str) -> Result<()> {
        self.logged("feed_delete_by_id", self.feed_table_name(), || {
            self.delete_by_id("feed_delete_by_id", self.feed_table_name(), id)
        })
    }

    /// Mark the feed deleted as of now
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id; database errors propagate.
    pub fn feed_soft_delete(&self, feed: &mut Feed) -> Result<()> {
        self.logged("feed_soft_delete", self.feed_table_name(), || {
            self.soft_delete_entity("feed_soft_delete", self.feed_table_name(), feed)
        })
    }

    /// # Errors
    ///
    /// `InvalidInput` for an empty id, `NotFound` when no visible feed has
    /// the id.
    pub fn feed_soft_delete_by_id(&self, id: &str) -> Result<()> {
        const OP: &str = "feed_soft_delete_by_id";
        self.logged(OP, self.feed_table_name(), || {
            let mut feed = self
                .find_feed(OP, id)?
                .ok_or_else(|| not_found(OP, Feed::KIND, id))?;
            self.soft_delete_entity(OP, self.feed_table_name(), &mut feed)
        })
    }

    // ---------- links ----------

    /// Insert a new link, stamping `created_at` and `updated_at`
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id; database errors propagate.
    pub fn link_create(&self, link: &mut Link) -> Result<()> {
        self.logged("link_create", self.link_table_name(), || {
            self.create_entity("link_create", self.link_table_name(), link)
        })
    }

    /// # Errors
    ///
    /// `InvalidInput` for an empty id; database errors propagate.
    pub fn link_find_by_id(&self, id: &str) -> Result<Option<Link>> {
        self.logged("link_find_by_id", self.link_table_name(), || {
            self.find_link("link_find_by_id", id)
        })
    }

    /// # Errors
    ///
    /// Validation and database errors propagate; nothing is returned partially.
    pub fn link_list(&self, query: &LinkQuery) -> Result<Vec<Link>> {
        self.logged("link_list", self.link_table_name(), || {
            let statement = query.compile(self.link_table_name(), self.dialect)?;
            self.fetch(&statement)
        })
    }

    /// Count links matching `query`, or all visible links when `None`
    ///
    /// # Errors
    ///
    /// Validation and database errors propagate.
    pub fn link_count(&self, query: Option<LinkQuery>) -> Result<i64> {
        self.logged("link_count", self.link_table_name(), || {
            let query = query.unwrap_or_default().set_count_only(true);
            let statement = query.compile(self.link_table_name(), self.dialect)?;
            self.fetch_count(&statement)
        })
    }

    /// Persist the link's dirty columns
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id; database errors propagate and leave
    /// the link dirty.
    pub fn link_update(&self, link: &mut Link) -> Result<()> {
        self.logged("link_update", self.link_table_name(), || {
            self.update_entity("link_update", self.link_table_name(), link)
        })
    }

    /// Hard delete
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id; a missing row is not an error.
    pub fn link_delete(&self, link: &Link) -> Result<()> {
        self.logged("link_delete", self.link_table_name(), || {
            self.delete_by_id("link_delete", self.link_table_name(), link.entity_id())
        })
    }

    /// # Errors
    ///
    /// `InvalidInput` for an empty id; a missing row is not an error.
    pub fn link_delete_by_id(&self, id: &str) -> Result<()> {
        self.logged("link_delete_by_id", self.link_table_name(), || {
            self.delete_by_id("link_delete_by_id", self.link_table_name(), id)
        })
    }

    /// Mark the link deleted as of now
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty id; database errors propagate.
    pub fn link_soft_delete(&self, link: &mut Link) -> Result<()> {
        self.logged("link_soft_delete", self.link_table_name(), || {
            self.soft_delete_entity("link_soft_delete", self.link_table_name(), link)
        })
    }

    /// # Errors
    ///
    /// `InvalidInput` for an empty id, `NotFound` when no visible link has
    /// the id.
    pub fn link_soft_delete_by_id(&self, id: &str) -> Result<()> {
        const OP: &str = "link_soft_delete_by_id";
        self.logged(OP, self.link_table_name(), || {
            let mut link = self
                .find_link(OP, id)?
                .ok_or_else(|| not_found(OP, Link::KIND, id))?;
            self.soft_delete_entity(OP, self.link_table_name(), &mut link)
        })
    }

    // ---------- internals ----------

    fn logged<T>(
        &self,
        op: &'static str,
        table: &str,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        log_op_start!(op, table);
        let started = Instant::now();

        match f() {
            Ok(value) => {
                log_op_end!(op, table, started);
                Ok(value)
            }
            Err(e) => {
                log_op_error!(op, table, started, e.clone());
                Err(e)
            }
        }
    }

    fn echo(&self, sql: &str, param_count: usize) {
        if self.options.debug {
            tracing::info!(
                { { FIELD_EVENT } = EVENT_SQL, { FIELD_SQL } = sql, { FIELD_PARAM_COUNT } = param_count },
                "sql"
            );
        } else {
            tracing::debug!({ { FIELD_SQL } = sql, { FIELD_PARAM_COUNT } = param_count }, "sql");
        }
    }

    fn execute(&self, statement: &Statement) -> Result<usize> {
        self.echo(&statement.sql, statement.params.len());
        self.conn
            .execute(&statement.sql, params_from_iter(statement.params.iter()))
            .map_err(from_rusqlite)
    }

    fn fetch<E: Entity>(&self, statement: &Statement) -> Result<Vec<E>> {
        self.echo(&statement.sql, statement.params.len());
        let mut stmt = self.conn.prepare(&statement.sql).map_err(from_rusqlite)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

        let records = stmt
            .query_map(params_from_iter(statement.params.iter()), |row| {
                row_to_record(row, &columns)
            })
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        tracing::debug!(
            { { FIELD_ENTITY_KIND } = E::KIND, { FIELD_ROW_COUNT } = records.len() },
            "hydrated rows"
        );
        Ok(records.into_iter().map(E::from_record).collect())
    }

    fn fetch_count(&self, statement: &Statement) -> Result<i64> {
        self.echo(&statement.sql, statement.params.len());
        let count: Option<i64> = self
            .conn
            .query_row(&statement.sql, params_from_iter(statement.params.iter()), |row| {
                row.get(0)
            })
            .optional()
            .map_err(from_rusqlite)?;
        Ok(count.unwrap_or(0))
    }

    fn find_feed(&self, op: &str, id: &str) -> Result<Option<Feed>> {
        if id.is_empty() {
            return Err(invalid_input(op, "feed id is empty"));
        }
        let query = FeedQuery::new().set_id(id).set_limit(1);
        let statement = query.compile(self.feed_table_name(), self.dialect)?;
        Ok(self.fetch(&statement)?.into_iter().next())
    }

    fn find_link(&self, op: &str, id: &str) -> Result<Option<Link>> {
        if id.is_empty() {
            return Err(invalid_input(op, "link id is empty"));
        }
        let query = LinkQuery::new().set_id(id).set_limit(1);
        let statement = query.compile(self.link_table_name(), self.dialect)?;
        Ok(self.fetch(&statement)?.into_iter().next())
    }

    fn create_entity<E: Entity>(&self, op: &str, table: &str, entity: &mut E) -> Result<()> {
        if entity.entity_id().is_empty() {
            return Err(invalid_input(op, &format!("{} id is empty", E::KIND)));
        }

        let now = datetime::now_string();
        entity
            .record_mut()
            .set(COLUMN_CREATED_AT, now.clone())
            .set(COLUMN_UPDATED_AT, now);

        let mut insert = InsertStatement::new(table);
        for (column, value) in entity.record().data() {
            insert.value(column.as_str(), value.as_str());
        }
        let statement = insert.to_sql(self.dialect)?;
        self.execute(&statement)?;

        entity.record_mut().mark_clean();
        tracing::debug!(
            { { FIELD_TABLE } = table, { FIELD_ENTITY_ID } = entity.entity_id() },
            "inserted"
        );
        Ok(())
    }

    fn update_entity<E: Entity>(&self, op: &str, table: &str, entity: &mut E) -> Result<()> {
        if entity.entity_id().is_empty() {
            return Err(invalid_input(op, &format!("{} id is empty", E::KIND)));
        }

        let dirty: Vec<String> = entity
            .record()
            .dirty_columns()
            .into_iter()
            .filter(|c| *c != COLUMN_ID && *c != COLUMN_UPDATED_AT)
            .map(String::from)
            .collect();
        if dirty.is_empty() {
            tracing::debug!(
                { { FIELD_TABLE } = table, { FIELD_ENTITY_ID } = entity.entity_id() },
                "no changes to persist"
            );
            return Ok(());
        }

        // The id is never rewritten; key the update on the stored value.
        let id = entity
            .record()
            .persisted_value(COLUMN_ID)
            .unwrap_or_else(|| entity.entity_id())
            .to_string();
        let now = datetime::now_string();

        let mut update = UpdateStatement::new(table);
        for column in &dirty {
            update.set(column.as_str(), entity.record().get(column));
        }
        update
            .set(COLUMN_UPDATED_AT, now.as_str())
            .filter(Predicate::eq(COLUMN_ID, id.as_str()));
        let statement = update.to_sql(self.dialect)?;
        let affected = self.execute(&statement)?;

        let record = entity.record_mut();
        record.set(COLUMN_UPDATED_AT, now).set(COLUMN_ID, id.clone());
        record.mark_clean();
        tracing::debug!(
            { { FIELD_TABLE } = table, { FIELD_ENTITY_ID } = id.as_str(), columns = dirty.len(), { FIELD_ROWS_AFFECTED } = affected },
            "updated"
        );
        Ok(())
    }

    fn delete_by_id(&self, op: &str, table: &str, id: &str) -> Result<()> {
        if id.is_empty() {
            return Err(invalid_input(op, "id is empty"));
        }
        let mut delete = DeleteStatement::new(table);
        delete.filter(Predicate::eq(COLUMN_ID, id));
        let statement = delete.to_sql(self.dialect)?;
        let affected = self.execute(&statement)?;
        tracing::debug!(
            { { FIELD_TABLE } = table, { FIELD_ENTITY_ID } = id, { FIELD_ROWS_AFFECTED } = affected },
            "deleted"
        );
        Ok(())
    }

    fn soft_delete_entity<E: Entity>(&self, op: &str, table: &str, entity: &mut E) -> Result<()> {
        if entity.entity_id().is_empty() {
            return Err(invalid_input(op, &format!("{} id is empty", E::KIND)));
        }
        entity
            .record_mut()
            .set(COLUMN_SOFT_DELETED_AT, datetime::now_string());
        self.update_entity(op, table, entity)
    }
}
