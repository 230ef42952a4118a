//! FoxDB tool - create, inspect and edit FoxDB store files

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::ValueArgs;

/// FoxDB store file tool
#[derive(Parser, Debug)]
#[command(name = "foxdb")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// TOML file with store settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Leave bytes past the new end of file in place when saving
    #[arg(long)]
    no_truncate: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an empty store
    Init {
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// List every record with its offset, size, type and value
    Dump { path: PathBuf },
    /// Print the value stored under a key
    Get { path: PathBuf, key: String },
    /// Insert a value, replacing any record with the same key
    Set {
        path: PathBuf,
        key: String,
        #[command(flatten)]
        value: ValueArgs,
        /// Content id for --bin values
        #[arg(long, default_value_t = 0)]
        cid: u64,
    },
    /// Remove the record stored under a key
    Remove { path: PathBuf, key: String },
    /// Check every record in the store
    Verify { path: PathBuf },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let log_level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = commands::load_config(args.config.as_deref())?;
    if args.no_truncate {
        config.truncate_on_save = false;
    }
    debug!("Store settings: {:?}", config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Init { path, force } => commands::init(&path, force, config, &mut out),
        Command::Dump { path } => commands::dump(&path, &mut out),
        Command::Get { path, key } => commands::get(&path, &key, &mut out),
        Command::Set {
            path,
            key,
            value,
            cid,
        } => commands::set(&path, &key, &value, cid, config, &mut out),
        Command::Remove { path, key } => commands::remove(&path, &key, config, &mut out),
        Command::Verify { path } => commands::verify(&path, &mut out),
    }
}
