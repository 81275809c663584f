//! Database connection management
//!
//! The store borrows a connection; these helpers are for callers that need
//! to open one.

use crate::errors::{from_rusqlite, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Apply connection settings for file-backed databases
pub fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")
        .map_err(from_rusqlite)?;
    conn.pragma_update(None, "busy_timeout", 5000)
        .map_err(from_rusqlite)?;
    Ok(())
}
