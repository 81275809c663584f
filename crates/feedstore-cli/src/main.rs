//! feedstore CLI
//!
//! Command-line interface over the feed and link store

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use feedstore_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "feedstore")]
#[command(about = "feedstore - persist feeds and their links", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database path, overriding the config file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Echo generated SQL
    #[arg(long, global = true)]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the feed and link tables if missing
    Migrate,
    /// Feed operations
    Feed(commands::feed::FeedArgs),
    /// Link operations
    Link(commands::link::LinkArgs),
}

fn main() {
    let cli = Cli::parse();

    init(if cli.json_logs {
        Profile::Production
    } else {
        Profile::Development
    });

    let global = commands::GlobalOptions {
        config: cli.config,
        db: cli.db,
        debug: cli.debug,
    };

    let result = match cli.command {
        Commands::Migrate => commands::migrate::execute(&global),
        Commands::Feed(args) => commands::feed::execute(&global, args),
        Commands::Link(args) => commands::link::execute(&global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
