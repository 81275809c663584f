//! Subcommand handlers and the plumbing they share

pub mod feed;
pub mod link;
pub mod migrate;

use std::error::Error;
use std::path::PathBuf;

use feedstore_store::{db, StoreConfig};
use rusqlite::Connection;
use serde::Serialize;

pub type CliResult<T> = Result<T, Box<dyn Error>>;

/// Flags accepted by every subcommand
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
    pub debug: bool,
}

/// Config file (or defaults) with command-line overrides applied
pub fn load_config(global: &GlobalOptions) -> CliResult<StoreConfig> {
    let mut config = match &global.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    if let Some(db) = &global.db {
        config.database_path = db.clone();
    }
    if global.debug {
        config.store.debug = true;
    }
    Ok(config)
}

pub fn open_connection(config: &StoreConfig) -> CliResult<Connection> {
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!(path = %config.database_path.display(), "opening database");
    let conn = db::open(&config.database_path)?;
    db::configure(&conn)?;
    Ok(conn)
}

/// Print one JSON document per line
pub fn print_json<T: Serialize>(value: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct CountOutput {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct DeleteOutput<'a> {
    pub id: &'a str,
    pub deleted: bool,
    pub soft: bool,
}
