//! Server and command line interface for the `shelf` book tracker.
//!
//! The `shelf` binary serves the HTTP API a front end talks to, and exposes the same
//! operations on the command line:
//! - Serving the JSON API (`serve`)
//! - Catalog search with reading statuses merged in
//! - Setting and removing reading statuses
//! - Browsing the library by status, and per-status counts
//! - Search cache and database maintenance
//!
//! # Usage
//!
//! ```bash
//! # Serve the API on the configured address
//! shelf serve --bind 127.0.0.1:7000
//!
//! # Search the catalog
//! shelf search "the left hand of darkness"
//!
//! # Put a book on the reading list
//! shelf set /works/OL59863W to-read --title "The Left Hand of Darkness" --author "Ursula K. Le Guin"
//!
//! # Show the reading list
//! shelf library to-read
//!
//! # Remove the database
//! shelf clean
//! ```
//!
//! Destructive operations ask for confirmation unless `--accept-defaults` is given,
//! and `-v` flags raise the logging detail.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::{Path, PathBuf};

use clap::{builder::ArgAction, Parser, Subcommand};
use console::style;
use shelf::{book::*, error::ShelfError, Config, Shelf};
use tracing::{debug, error, info, trace};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub mod commands;
pub mod error;
pub mod interaction;
pub mod server;

use crate::{commands::*, error::*, interaction::*};

/// Command line interface configuration and argument parsing
#[derive(Parser)]
#[command(author, version, about = "Server and CLI for the shelf book tracker")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Path to the database file. If not specified, the configured path (or the default
  /// platform-specific data directory) is used.
  #[arg(long, short, global = true)]
  path: Option<PathBuf>,

  /// Path to the configuration file. Defaults to the platform-specific config directory.
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// Loads the configuration and applies command line overrides.
  fn load_config(&self) -> Result<Config> {
    let path = self.config.clone().unwrap_or_else(Config::default_path);
    let mut config = Config::load(&path)?;
    if let Some(database_path) = &self.path {
      config = config.with_database_path(database_path);
    }
    trace!("Using database at: {}", config.database_path.display());
    Ok(config)
  }
}

/// Configures the logging system based on the verbosity level
///
/// # Arguments
///
/// * `verbosity` - Number of times the verbose flag was used
/// * `log_dir` - Directory for daily rolling log files, in addition to the terminal
///
/// The verbosity levels are:
/// - 0: error (default)
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
///
/// The returned guard flushes the log file when dropped and must be held for as long
/// as logging is needed.
fn setup_logging(verbosity: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  let terminal = fmt::layer()
    .with_file(true)
    .with_line_number(true)
    .with_thread_ids(true)
    .with_target(true);

  let (file, guard) = match log_dir {
    Some(dir) => {
      let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, "shelf.log"));
      let layer = fmt::layer().with_writer(writer).with_ansi(false).with_target(true);
      (Some(layer), Some(guard))
    },
    None => (None, None),
  };

  tracing_subscriber::registry().with(filter).with(terminal).with(file).init();
  guard
}

/// Entry point for the shelf CLI application
///
/// Parses the command line, sets up logging, and executes the requested command.
///
/// # Errors
///
/// Returns [`ShelfdError`] for failures including:
/// - Catalog and database failures
/// - Invalid configuration or bind address
/// - File system errors
/// - User interaction errors
#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  let log_dir = match &cli.command {
    Commands::Serve(args) => args.log_dir.clone(),
    _ => None,
  };
  let guard = setup_logging(cli.verbose, log_dir.as_deref());

  let interaction = Terminal::new(cli.accept_defaults);
  if let Err(e) = run(&cli, &interaction).await {
    debug!("Command failed: {e:?}");
    interaction.reply(ResponseContent::Error(&e))?;
    drop(guard);
    std::process::exit(1);
  }
  Ok(())
}

/// Runs the parsed command.
async fn run<I: UserInteraction>(cli: &Cli, interaction: &I) -> Result<()> {
  let config = cli.load_config()?;
  if let Commands::Clean = cli.command {
    return clean(interaction, &config.database_path);
  }

  let shelf = Shelf::open(config).await?;
  match cli.command.clone() {
    Commands::Serve(args) => serve(interaction, shelf, args).await,
    Commands::Search(args) => search(interaction, &shelf, args).await,
    Commands::Set(args) => set(interaction, &shelf, args).await,
    Commands::Remove { work_key } => remove(interaction, &shelf, &work_key).await,
    Commands::Library { status } => library(interaction, &shelf, status).await,
    Commands::Counts => counts(interaction, &shelf).await,
    Commands::Cache { cmd } => cache(interaction, &shelf, cmd).await,
    Commands::Clean => Ok(()),
  }
}
