use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::record::Record;
use super::*;
use crate::datetime::{self, MAX_DATETIME, NULL_DATETIME};

/// Feed - a source that is fetched periodically and produces links
///
/// All fields live in the underlying [`Record`] as strings; the typed
/// helpers (`fetch_interval_secs`, `*_datetime`) parse on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Feed {
    record: Record,
}

const FEED_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_STATUS,
    COLUMN_NAME,
    COLUMN_DESCRIPTION,
    COLUMN_URL,
    COLUMN_FETCH_INTERVAL,
    COLUMN_LAST_FETCHED_AT,
    COLUMN_MEMO,
    COLUMN_CREATED_AT,
    COLUMN_UPDATED_AT,
    COLUMN_SOFT_DELETED_AT,
];

impl Feed {
    /// Create a new feed with defaults for every column
    ///
    /// The feed gets a fresh UUIDv7 id, `inactive` status, a 600 second fetch
    /// interval and the not-deleted sentinel. Every column is dirty.
    pub fn new() -> Self {
        let now = datetime::now_string();
        let mut feed = Self {
            record: Record::new(),
        };
        feed.set_id(Uuid::now_v7().to_string())
            .set_status(FEED_STATUS_INACTIVE)
            .set_name("")
            .set_description("")
            .set_url("")
            .set_fetch_interval_secs(DEFAULT_FETCH_INTERVAL_SECS)
            .set_last_fetched_at(NULL_DATETIME)
            .set_memo("")
            .set_created_at(now.clone())
            .set_updated_at(now)
            .set_soft_deleted_at(MAX_DATETIME);
        feed
    }

    pub fn id(&self) -> &str {
        self.record.get(COLUMN_ID)
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_ID, id);
        self
    }

    pub fn status(&self) -> &str {
        self.record.get(COLUMN_STATUS)
    }

    pub fn set_status(&mut self, status: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_STATUS, status);
        self
    }

    pub fn name(&self) -> &str {
        self.record.get(COLUMN_NAME)
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_NAME, name);
        self
    }

    pub fn description(&self) -> &str {
        self.record.get(COLUMN_DESCRIPTION)
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_DESCRIPTION, description);
        self
    }

    pub fn url(&self) -> &str {
        self.record.get(COLUMN_URL)
    }

    pub fn set_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_URL, url);
        self
    }

    /// Fetch interval in seconds, as stored
    pub fn fetch_interval(&self) -> &str {
        self.record.get(COLUMN_FETCH_INTERVAL)
    }

    /// Fetch interval parsed as seconds
    pub fn fetch_interval_secs(&self) -> Option<i64> {
        self.fetch_interval().trim().parse().ok()
    }

    pub fn set_fetch_interval_secs(&mut self, secs: i64) -> &mut Self {
        self.record.set(COLUMN_FETCH_INTERVAL, secs.to_string());
        self
    }

    /// Last fetch time, or [`NULL_DATETIME`] if never fetched
    pub fn last_fetched_at(&self) -> &str {
        self.record.get(COLUMN_LAST_FETCHED_AT)
    }

    pub fn last_fetched_at_datetime(&self) -> Option<DateTime<Utc>> {
        datetime::parse_datetime(self.last_fetched_at())
    }

    pub fn set_last_fetched_at(&mut self, last_fetched_at: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_LAST_FETCHED_AT, last_fetched_at);
        self
    }

    pub fn memo(&self) -> &str {
        self.record.get(COLUMN_MEMO)
    }

    pub fn set_memo(&mut self, memo: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_MEMO, memo);
        self
    }

    pub fn created_at(&self) -> &str {
        self.record.get(COLUMN_CREATED_AT)
    }

    pub fn created_at_datetime(&self) -> Option<DateTime<Utc>> {
        datetime::parse_datetime(self.created_at())
    }

    pub fn set_created_at(&mut self, created_at: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_CREATED_AT, created_at);
        self
    }

    pub fn updated_at(&self) -> &str {
        self.record.get(COLUMN_UPDATED_AT)
    }

    pub fn updated_at_datetime(&self) -> Option<DateTime<Utc>> {
        datetime::parse_datetime(self.updated_at())
    }

    pub fn set_updated_at(&mut self, updated_at: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_UPDATED_AT, updated_at);
        self
    }

    /// Soft-delete timestamp; [`MAX_DATETIME`] while the feed is live
    pub fn soft_deleted_at(&self) -> &str {
        self.record.get(COLUMN_SOFT_DELETED_AT)
    }

    pub fn soft_deleted_at_datetime(&self) -> Option<DateTime<Utc>> {
        datetime::parse_datetime(self.soft_deleted_at())
    }

    pub fn set_soft_deleted_at(&mut self, soft_deleted_at: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_SOFT_DELETED_AT, soft_deleted_at);
        self
    }

    /// True once the soft-delete timestamp is at or before now
    pub fn is_soft_deleted(&self) -> bool {
        self.soft_deleted_at() <= datetime::now_string().as_str()
    }

    pub fn data(&self) -> &std::collections::BTreeMap<String, String> {
        self.record.data()
    }

    pub fn data_changed(&self) -> std::collections::BTreeMap<String, String> {
        self.record.data_changed()
    }

    pub fn mark_clean(&mut self) {
        self.record.mark_clean();
    }
}

impl Default for Feed {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Feed {
    const KIND: &'static str = "feed";

    fn columns() -> &'static [&'static str] {
        FEED_COLUMNS
    }

    fn from_record(record: Record) -> Self {
        Self { record }
    }

    fn record(&self) -> &Record {
        &self.record
    }

    fn record_mut(&mut self) -> &mut Record {
        &mut self.record
    }
}
