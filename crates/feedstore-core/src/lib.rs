//! feedstore core - records, queries and SQL generation for feeds and links
//!
//! This crate provides:
//! - Change-tracked `Record`s and the `Feed` / `Link` models built on them
//! - Optional-filter `FeedQuery` / `LinkQuery` compiling to parameterised SQL
//! - A small statement builder with SQLite, PostgreSQL and MySQL dialects
//! - The error and logging facilities shared by every feedstore crate
//!
//! Nothing here touches a database; see `feedstore-store` for that.

pub mod datetime;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod query;
pub mod sql;

// Used by the logging macros
pub use feedstore_core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, QueryError, Result, SqlBuildError};
pub use model::{Entity, Feed, Link, Record};
pub use query::{FeedQuery, LinkQuery};
pub use sql::{Dialect, Statement};
