use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::record::Record;
use super::*;
use crate::datetime::{self, MAX_DATETIME, NULL_DATETIME};

/// Link - a single item published by a feed
///
/// `feed_id` references the owning feed by value only; nothing enforces
/// that the feed exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Link {
    record: Record,
}

const LINK_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_STATUS,
    COLUMN_FEED_ID,
    COLUMN_TITLE,
    COLUMN_DESCRIPTION,
    COLUMN_URL,
    COLUMN_TIME,
    COLUMN_VOTES_UP,
    COLUMN_VOTES_DOWN,
    COLUMN_VIEWS,
    COLUMN_REPORT,
    COLUMN_REPORTED_AT,
    COLUMN_CHECKED_AT,
    COLUMN_CREATED_AT,
    COLUMN_UPDATED_AT,
    COLUMN_SOFT_DELETED_AT,
];

fn parse_count(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

impl Link {
    /// Create a new link with defaults for every column
    ///
    /// Counters start at zero, event timestamps at [`NULL_DATETIME`], and
    /// `feed_id` empty; callers are expected to set it before persisting.
    pub fn new() -> Self {
        let now = datetime::now_string();
        let mut link = Self {
            record: Record::new(),
        };
        link.set_id(Uuid::now_v7().to_string())
            .set_status(LINK_STATUS_INACTIVE)
            .set_feed_id("")
            .set_title("")
            .set_description("")
            .set_url("")
            .set_time(NULL_DATETIME)
            .set_votes_up(0)
            .set_votes_down(0)
            .set_views(0)
            .set_report("")
            .set_reported_at(NULL_DATETIME)
            .set_checked_at(NULL_DATETIME)
            .set_created_at(now.clone())
            .set_updated_at(now)
            .set_soft_deleted_at(MAX_DATETIME);
        link
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

    pub fn feed_id(&self) -> &str {
        self.record.get(COLUMN_FEED_ID)
    }

    pub fn set_feed_id(&mut self, feed_id: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_FEED_ID, feed_id);
        self
    }

    pub fn title(&self) -> &str {
        self.record.get(COLUMN_TITLE)
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_TITLE, title);
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

    /// Publication time reported by the feed
    pub fn time(&self) -> &str {
        self.record.get(COLUMN_TIME)
    }

    pub fn time_datetime(&self) -> Option<DateTime<Utc>> {
        datetime::parse_datetime(self.time())
    }

    pub fn set_time(&mut self, time: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_TIME, time);
        self
    }

    pub fn votes_up(&self) -> &str {
        self.record.get(COLUMN_VOTES_UP)
    }

    pub fn votes_up_count(&self) -> Option<i64> {
        parse_count(self.votes_up())
    }

    /// Counters take integers so the stored text matches what the
    /// INTEGER column hands back on reload
    pub fn set_votes_up(&mut self, votes_up: i64) -> &mut Self {
        self.record.set(COLUMN_VOTES_UP, votes_up.to_string());
        self
    }

    pub fn votes_down(&self) -> &str {
        self.record.get(COLUMN_VOTES_DOWN)
    }

    pub fn votes_down_count(&self) -> Option<i64> {
        parse_count(self.votes_down())
    }

    pub fn set_votes_down(&mut self, votes_down: i64) -> &mut Self {
        self.record.set(COLUMN_VOTES_DOWN, votes_down.to_string());
        self
    }

    pub fn views(&self) -> &str {
        self.record.get(COLUMN_VIEWS)
    }

    pub fn views_count(&self) -> Option<i64> {
        parse_count(self.views())
    }

    pub fn set_views(&mut self, views: i64) -> &mut Self {
        self.record.set(COLUMN_VIEWS, views.to_string());
        self
    }

    pub fn report(&self) -> &str {
        self.record.get(COLUMN_REPORT)
    }

    pub fn set_report(&mut self, report: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_REPORT, report);
        self
    }

    pub fn reported_at(&self) -> &str {
        self.record.get(COLUMN_REPORTED_AT)
    }

    pub fn reported_at_datetime(&self) -> Option<DateTime<Utc>> {
        datetime::parse_datetime(self.reported_at())
    }

    pub fn set_reported_at(&mut self, reported_at: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_REPORTED_AT, reported_at);
        self
    }

    /// Last time the URL was checked for liveness
    pub fn checked_at(&self) -> &str {
        self.record.get(COLUMN_CHECKED_AT)
    }

    pub fn set_checked_at(&mut self, checked_at: impl Into<String>) -> &mut Self {
        self.record.set(COLUMN_CHECKED_AT, checked_at);
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

    pub fn is_soft_deleted(&self) -> bool {
        self.soft_deleted_at() <= datetime::now_string().as_str()
    }

    /// Flag the link as reported with the given reason
    pub fn report_with(&mut self, reason: impl Into<String>) -> &mut Self {
        self.set_report(reason)
            .set_reported_at(datetime::now_string())
            .set_status(LINK_STATUS_REPORTED)
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

impl Default for Link {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity for Link {
    const KIND: &'static str = "link";

    fn columns() -> &'static [&'static str] {
        LINK_COLUMNS
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
