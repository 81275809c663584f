//! Table creation

use feedstore_store::Store;
use serde::Serialize;

use super::{load_config, open_connection, print_json, CliResult, GlobalOptions};

#[derive(Debug, Serialize)]
struct MigrateOutput<'a> {
    migrated: bool,
    feed_table: &'a str,
    link_table: &'a str,
}

pub fn execute(global: &GlobalOptions) -> CliResult<()> {
    let config = load_config(global)?;
    let conn = open_connection(&config)?;

    let mut options = config.store.clone();
    options.automigrate = false;
    let store = Store::new(&conn, options)?;
    store.auto_migrate()?;

    print_json(&MigrateOutput {
        migrated: true,
        feed_table: store.feed_table_name(),
        link_table: store.link_table_name(),
    })
}
