//! Feed and link models backed by change-tracked records

pub mod feed;
pub mod link;
pub mod record;

pub use feed::Feed;
pub use link::Link;
pub use record::Record;

// Column names shared by both tables
pub const COLUMN_ID: &str = "id";
pub const COLUMN_STATUS: &str = "status";
pub const COLUMN_DESCRIPTION: &str = "description";
pub const COLUMN_URL: &str = "url";
pub const COLUMN_CREATED_AT: &str = "created_at";
pub const COLUMN_UPDATED_AT: &str = "updated_at";
pub const COLUMN_SOFT_DELETED_AT: &str = "soft_deleted_at";

// Feed columns
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_FETCH_INTERVAL: &str = "fetch_interval";
pub const COLUMN_LAST_FETCHED_AT: &str = "last_fetched_at";
pub const COLUMN_MEMO: &str = "memo";

// Link columns
pub const COLUMN_FEED_ID: &str = "feed_id";
pub const COLUMN_TITLE: &str = "title";
pub const COLUMN_TIME: &str = "time";
pub const COLUMN_VOTES_UP: &str = "votes_up";
pub const COLUMN_VOTES_DOWN: &str = "votes_down";
pub const COLUMN_VIEWS: &str = "views";
pub const COLUMN_REPORT: &str = "report";
pub const COLUMN_REPORTED_AT: &str = "reported_at";
pub const COLUMN_CHECKED_AT: &str = "checked_at";

pub const FEED_STATUS_ACTIVE: &str = "active";
pub const FEED_STATUS_INACTIVE: &str = "inactive";

pub const LINK_STATUS_ACTIVE: &str = "active";
pub const LINK_STATUS_INACTIVE: &str = "inactive";
pub const LINK_STATUS_REPORTED: &str = "reported";

/// Seconds between fetches for a new feed
pub const DEFAULT_FETCH_INTERVAL_SECS: i64 = 600;

/// A persisted entity: a typed view over a [`Record`]
///
/// The store is written once against this trait and serves both feeds and
/// links.
pub trait Entity: Sized {
    /// Short name used in error messages and log fields ("feed", "link")
    const KIND: &'static str;

    /// Every column the entity's table defines, in table order
    fn columns() -> &'static [&'static str];

    /// Wrap a record hydrated from storage
    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    fn entity_id(&self) -> &str {
        self.record().get(COLUMN_ID)
    }

    /// Build a clean entity from a column map loaded out of storage
    fn from_existing<I, K, V>(data: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::from_record(Record::from_existing(data))
    }
}
