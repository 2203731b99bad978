//! Personal book tracking: catalog search, reading statuses and a per-status library.
//!
//! `shelf` is a library for keeping track of the books you read, providing:
//!
//! - Book search against the OpenLibrary catalog, with a local response cache
//! - Reading statuses (to read, did not finish, completed) stored in SQLite
//! - A library view grouped by status, with per-status counts
//! - The interaction core of a client: debounced, cancellable search, status changes
//!   with undo, transient notifications and URL routing
//!
//! # Getting Started
//!
//! ```no_run
//! use shelf::{book::ReadingStatus, Config, Shelf};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let shelf = Shelf::open(Config::default()).await?;
//!
//!   // Search the catalog
//!   let result = shelf.search("dune", 1, 100).await?;
//!   let book = &result.books[0];
//!
//!   // Put the first hit on the reading list
//!   shelf.set_status(&book.work_key, ReadingStatus::ToRead, &book.metadata()).await?;
//!
//!   let counts = shelf.status_counts().await?;
//!   println!("{} books to read", counts.to_read);
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`book`]: Core book and status types shared by every layer
//! - [`catalog`]: OpenLibrary search client and response normalization
//! - [`database`]: SQLite storage for statuses and cached searches
//! - [`client`]: Client-side interaction logic driven by a [`client::ShelfApi`]
//! - [`config`]: TOML configuration
//! - [`error`]: Error type and `Result` alias

#![warn(missing_docs)]

use std::{
  fmt::Display,
  path::{Path, PathBuf},
  str::FromStr,
  time::Duration,
};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod book;
pub mod catalog;
pub mod client;
pub mod config;
pub mod database;
pub mod error;

pub use crate::config::Config;
use crate::{
  book::*,
  catalog::Catalog,
  database::Database,
  error::{Result, ShelfError},
};

/// Largest page size accepted by [`Shelf::search`].
pub const MAX_SEARCH_LIMIT: u32 = 100;

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use shelf::prelude::*;
///
/// async fn example(api: &dyn ShelfApi) -> Result<(), ShelfError> {
///   let counts = api.counts().await?;
///   println!("{} completed", counts.completed);
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    book::{Book, ReadingStatus},
    client::ShelfApi,
    error::ShelfError,
  };
}

/// The shelf backend: catalog access, search cache and status storage.
///
/// This is what the HTTP server serves and what the CLI drives directly.
#[derive(Clone)]
pub struct Shelf {
  /// Configuration the shelf was opened with
  pub config:   Config,
  /// Catalog client
  pub catalog:  Catalog,
  /// Status and cache storage
  pub database: Database,
}

impl Shelf {
  /// Opens the database named in `config` and builds the catalog client.
  pub async fn open(config: Config) -> Result<Self> {
    let database = Database::open(&config.database_path).await?;
    let catalog = Catalog::new(&config)?;
    Ok(Self { config, catalog, database })
  }

  /// Searches the catalog.
  ///
  /// Fresh cached responses are served without touching the catalog; everything
  /// else is fetched and cached. Each returned book carries its reading status, if
  /// one is set.
  ///
  /// # Errors
  ///
  /// - [`ShelfError::InvalidRequest`] if the query is blank, `page` is zero, or
  ///   `limit` is outside `1..=100`
  /// - Catalog errors from [`Catalog::search_raw`]
  pub async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchResult> {
    if query.trim().is_empty() {
      return Err(ShelfError::InvalidRequest("Search query must not be empty".into()));
    }
    if page == 0 {
      return Err(ShelfError::InvalidRequest("Page must be at least 1".into()));
    }
    if limit == 0 || limit > MAX_SEARCH_LIMIT {
      return Err(ShelfError::InvalidRequest(format!(
        "Limit must be between 1 and {MAX_SEARCH_LIMIT}"
      )));
    }

    let raw = match self.database.cached_response(query, page, limit).await? {
      Some(raw) => raw,
      None => {
        let raw = self.catalog.search_raw(query, page, limit).await?;
        let ttl = TimeDelta::hours(self.config.cache_ttl_hours);
        if let Err(e) = self.database.store_response(query, page, limit, &raw, ttl).await {
          warn!("Failed to cache search response for {query:?}: {e}");
        }
        raw
      },
    };

    let mut result = self.catalog.parse_search_response(&raw, page, limit);
    let keys: Vec<String> = result.books.iter().map(|book| book.work_key.clone()).collect();
    let statuses = self.database.statuses_for(&keys).await?;
    for book in &mut result.books {
      book.status = statuses.get(&book.work_key).copied();
    }

    info!("Search {query:?} page {page}: {} of {} results", result.books.len(), result.total);
    Ok(result)
  }

  /// The status record of a work, if any.
  pub async fn get_status(&self, work_key: &str) -> Result<Option<StatusRecord>> {
    self.database.get_status(validate_work_key(work_key)?).await
  }

  /// Creates or updates the status of a work.
  ///
  /// # Errors
  ///
  /// - [`ShelfError::InvalidWorkKey`] if `work_key` is blank, contains whitespace or lacks the
  ///   leading `/`
  /// - [`ShelfError::InvalidRequest`] if the title is blank
  pub async fn set_status(
    &self,
    work_key: &str,
    status: ReadingStatus,
    metadata: &BookMetadata,
  ) -> Result<StatusRecord> {
    let work_key = validate_work_key(work_key)?;
    if metadata.title.trim().is_empty() {
      return Err(ShelfError::InvalidRequest("Title must not be empty".into()));
    }
    self.database.set_status(work_key, status, metadata).await
  }

  /// Removes the status of a work, returning whether one existed.
  pub async fn delete_status(&self, work_key: &str) -> Result<bool> {
    self.database.delete_status(validate_work_key(work_key)?).await
  }

  /// Every status record, most recently updated first.
  pub async fn list_statuses(&self) -> Result<Vec<StatusRecord>> {
    self.database.list_statuses().await
  }

  /// The books of one library tab.
  pub async fn library(&self, status: ReadingStatus) -> Result<LibraryPage> {
    let books = self.database.books_by_status(status).await?;
    Ok(LibraryPage { total: books.len() as u64, books })
  }

  /// Number of books per status.
  pub async fn status_counts(&self) -> Result<StatusCounts> { self.database.status_counts().await }
}

/// Rejects keys that cannot name a work.
///
/// Keys are absolute catalog paths, so `works/OL1W` is rejected rather than guessed at.
fn validate_work_key(work_key: &str) -> Result<&str> {
  let malformed = work_key.len() == 1 || work_key.chars().any(char::is_whitespace);
  if !work_key.starts_with('/') || malformed {
    return Err(ShelfError::InvalidWorkKey(work_key.to_string()));
  }
  Ok(work_key)
}
