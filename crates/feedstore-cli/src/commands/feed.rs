//! Feed subcommands

use clap::{Args, Subcommand};
use feedstore_core::model::{Feed, FEED_STATUS_INACTIVE};
use feedstore_core::query::FeedQuery;
use feedstore_store::Store;

use super::{
    load_config, open_connection, print_json, CliResult, CountOutput, DeleteOutput, GlobalOptions,
};

#[derive(Debug, Args)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommand,
}

#[derive(Debug, Subcommand)]
pub enum FeedCommand {
    /// Create a feed
    Add(AddArgs),
    /// List feeds as JSON lines
    List(ListArgs),
    /// Count feeds
    Count(CountArgs),
    /// Show one feed
    Show { id: String },
    /// Change a feed's status
    SetStatus { id: String, status: String },
    /// Delete a feed
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
    pub name: String,

    #[arg(long)]
    pub url: String,

    #[arg(long, default_value = FEED_STATUS_INACTIVE)]
    pub status: String,

    /// Seconds between fetches
    #[arg(long)]
    pub fetch_interval: Option<i64>,

    #[arg(long)]
    pub description: Option<String>,

    #[arg(long)]
    pub memo: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub limit: Option<i64>,

    #[arg(long)]
    pub offset: Option<i64>,

    #[arg(long)]
    pub order_by: Option<String>,

    /// `asc` or `desc`
    #[arg(long)]
    pub order_direction: Option<String>,

    /// Include soft-deleted feeds
    #[arg(long, conflicts_with = "only_deleted")]
    pub with_deleted: bool,

    /// Only soft-deleted feeds
    #[arg(long)]
    pub only_deleted: bool,
}

#[derive(Debug, Args)]
pub struct CountArgs {
    #[arg(long)]
    pub status: Option<String>,

    #[arg(long)]
    pub with_deleted: bool,
}

pub fn execute(global: &GlobalOptions, args: FeedArgs) -> CliResult<()> {
    let config = load_config(global)?;
    let conn = open_connection(&config)?;
    let store = Store::new(&conn, config.store.clone())?;

    match args.command {
        FeedCommand::Add(add) => execute_add(&store, add),
        FeedCommand::List(list) => execute_list(&store, list),
        FeedCommand::Count(count) => execute_count(&store, count),
        FeedCommand::Show { id } => execute_show(&store, &id),
        FeedCommand::SetStatus { id, status } => execute_set_status(&store, &id, status),
        FeedCommand::Delete { id, soft } => execute_delete(&store, &id, soft),
    }
}

fn execute_add(store: &Store<'_>, args: AddArgs) -> CliResult<()> {
    let mut feed = Feed::new();
    feed.set_name(args.name)
        .set_url(args.url)
        .set_status(args.status);
    if let Some(secs) = args.fetch_interval {
        feed.set_fetch_interval_secs(secs);
    }
    if let Some(description) = args.description {
        feed.set_description(description);
    }
    if let Some(memo) = args.memo {
        feed.set_memo(memo);
    }

    store.feed_create(&mut feed)?;
    print_json(&feed)
}

fn execute_list(store: &Store<'_>, args: ListArgs) -> CliResult<()> {
    let mut query = FeedQuery::new();
    if let Some(status) = args.status {
        query = query.set_status(status);
    }
    if let Some(limit) = args.limit {
        query = query.set_limit(limit);
    }
    if let Some(offset) = args.offset {
        query = query.set_offset(offset);
    }
    if let Some(order_by) = args.order_by {
        query = query.set_order_by(order_by);
    }
    if let Some(direction) = args.order_direction {
        query = query.set_order_direction(direction);
    }
    if args.with_deleted {
        query = query.set_with_soft_deleted(true);
    }
    if args.only_deleted {
        query = query.set_only_soft_deleted(true);
    }

    for feed in store.feed_list(&query)? {
        print_json(&feed)?;
    }
    Ok(())
}

fn execute_count(store: &Store<'_>, args: CountArgs) -> CliResult<()> {
    let mut query = FeedQuery::new();
    if let Some(status) = args.status {
        query = query.set_status(status);
    }
    if args.with_deleted {
        query = query.set_with_soft_deleted(true);
    }

    let count = store.feed_count(Some(query))?;
    print_json(&CountOutput { count })
}

fn execute_show(store: &Store<'_>, id: &str) -> CliResult<()> {
    match store.feed_find_by_id(id)? {
        Some(feed) => print_json(&feed),
        None => Err(format!("feed {} not found", id).into()),
    }
}

fn execute_set_status(store: &Store<'_>, id: &str, status: String) -> CliResult<()> {
    let mut feed = store
        .feed_find_by_id(id)?
        .ok_or_else(|| format!("feed {} not found", id))?;
    feed.set_status(status);
    store.feed_update(&mut feed)?;
    print_json(&feed)
}

fn execute_delete(store: &Store<'_>, id: &str, soft: bool) -> CliResult<()> {
    if soft {
        store.feed_soft_delete_by_id(id)?;
    } else {
        store.feed_delete_by_id(id)?;
    }
    print_json(&DeleteOutput {
        id,
        deleted: true,
        soft,
    })
}
