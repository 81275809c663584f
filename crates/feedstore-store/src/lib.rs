//! feedstore store - SQL persistence for feeds and links
//!
//! Provides:
//! - `Store`, the CRUD / soft-delete / count façade over a borrowed rusqlite connection
//! - DDL for the feed and link tables with idempotent auto-migration
//! - Row hydration into clean change-tracked records
//! - `StoreOptions` and the TOML `StoreConfig`

pub mod config;
pub mod db;
pub mod errors;
pub mod hydration;
pub mod schema;
pub mod store;

// Re-export key types
pub use config::{StoreConfig, StoreOptions};
pub use errors::Result;
pub use store::Store;
