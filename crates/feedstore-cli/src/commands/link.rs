//! Link subcommands

use clap::{Args, Subcommand};
use feedstore_core::model::{Link, LINK_STATUS_INACTIVE};
use feedstore_core::query::LinkQuery;
use feedstore_store::Store;

use super::{
    load_config, open_connection, print_json, CliResult, CountOutput, DeleteOutput, GlobalOptions,
};

#[derive(Debug, Args)]
pub struct LinkArgs {
    #[command(subcommand)]
    pub command: LinkCommand,
}

#[derive(Debug, Subcommand)]
pub enum LinkCommand {
    /// Create a link under a feed
    Add(AddArgs),
    /// List links as JSON lines
    List(ListArgs),
    /// Count links
    Count(CountArgs),
    /// Delete a link
    Delete {
        id: String,
        /// Mark deleted instead of removing the row
        #[arg(long)]
        soft: bool,
    },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub feed_id: String,

    #[arg(long)]
    pub url: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long, default_value = LINK_STATUS_INACTIVE)]
    pub status: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub feed_id: Option<String>,

    #[arg(long)]
    pub status: Option<String>,

    /// Defaults to 1000
    #[arg(long)]
    pub limit: Option<i64>,

    #[arg(long)]
    pub offset: Option<i64>,

    /// Include soft-deleted links
    #[arg(long, conflicts_with = "only_deleted")]
    pub with_deleted: bool,

    /// Only soft-deleted links
    #[arg(long)]
    pub only_deleted: bool,
}

#[derive(Debug, Args)]
pub struct CountArgs {
    #[arg(long)]
    pub feed_id: Option<String>,

    #[arg(long)]
    pub status: Option<String>,
}

pub fn execute(global: &GlobalOptions, args: LinkArgs) -> CliResult<()> {
    let config = load_config(global)?;
    let conn = open_connection(&config)?;
    let store = Store::new(&conn, config.store.clone())?;

    match args.command {
        LinkCommand::Add(add) => execute_add(&store, add),
        LinkCommand::List(list) => execute_list(&store, list),
        LinkCommand::Count(count) => execute_count(&store, count),
        LinkCommand::Delete { id, soft } => execute_delete(&store, &id, soft),
    }
}

fn execute_add(store: &Store<'_>, args: AddArgs) -> CliResult<()> {
    if args.feed_id.is_empty() {
        return Err("--feed-id cannot be empty".into());
    }

    let mut link = Link::new();
    link.set_feed_id(args.feed_id)
        .set_url(args.url)
        .set_status(args.status);
    if let Some(title) = args.title {
        link.set_title(title);
    }
    if let Some(description) = args.description {
        link.set_description(description);
    }

    store.link_create(&mut link)?;
    print_json(&link)
}

fn execute_list(store: &Store<'_>, args: ListArgs) -> CliResult<()> {
    let mut query = LinkQuery::new();
    if let Some(feed_id) = args.feed_id {
        query = query.set_feed_id(feed_id);
    }
    if let Some(status) = args.status {
        query = query.set_status(status);
    }
    if let Some(limit) = args.limit {
        query = query.set_limit(limit);
    }
    if let Some(offset) = args.offset {
        query = query.set_offset(offset);
    }
    if args.with_deleted {
        query = query.set_with_soft_deleted(true);
    }
    if args.only_deleted {
        query = query.set_only_soft_deleted(true);
    }

    for link in store.link_list(&query)? {
        print_json(&link)?;
    }
    Ok(())
}

fn execute_count(store: &Store<'_>, args: CountArgs) -> CliResult<()> {
    let mut query = LinkQuery::new();
    if let Some(feed_id) = args.feed_id {
        query = query.set_feed_id(feed_id);
    }
    if let Some(status) = args.status {
        query = query.set_status(status);
    }

    let count = store.link_count(Some(query))?;
    print_json(&CountOutput { count })
}

fn execute_delete(store: &Store<'_>, id: &str, soft: bool) -> CliResult<()> {
    if soft {
        store.link_soft_delete_by_id(id)?;
    } else {
        store.link_delete_by_id(id)?;
    }
    print_json(&DeleteOutput {
        id,
        deleted: true,
        soft,
    })
}
