//! Subcommands of the `shelf` binary.

use clap::Args;

use super::*;

pub mod cache;
pub mod clean;
pub mod counts;
pub mod library;
pub mod remove;
pub mod search;
pub mod serve;
pub mod set;

pub use cache::{cache, CacheCommands};
pub use clean::clean;
pub use counts::counts;
pub use library::library;
pub use remove::remove;
pub use search::{search, SearchArgs};
pub use serve::{serve, ServeArgs};
pub use set::{set, SetArgs};

/// Available commands for the CLI
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Serve the JSON API
  Serve(ServeArgs),

  /// Search the OpenLibrary catalog
  Search(SearchArgs),

  /// Set the reading status of a work
  Set(SetArgs),

  /// Remove the reading status of a work
  Remove {
    /// OpenLibrary work key, e.g. "/works/OL27448W"
    work_key: String,
  },

  /// List the books with a given status
  Library {
    /// Status to list (to-read, did-not-finish, completed)
    #[arg(value_parser = parse_status)]
    status: ReadingStatus,
  },

  /// Show how many books carry each status
  Counts,

  /// Manage the search response cache
  Cache {
    /// Cache maintenance to run
    #[command(subcommand)]
    cmd: CacheCommands,
  },

  /// Removes the entire database after confirmation
  Clean,
}

/// Parses a status given either as `did_not_finish` or as `did-not-finish`.
pub fn parse_status(s: &str) -> core::result::Result<ReadingStatus, ShelfError> {
  s.parse().or_else(|_| ReadingStatus::from_slug(s))
}
