//! Local SQLite storage for reading statuses and cached catalog searches.
//!
//! This module persists:
//! - One status record per OpenLibrary work, with the book metadata needed to show
//!   the library without asking the catalog again
//! - Raw catalog search responses, keyed by a hash of the normalized request and
//!   expiring after a configurable time-to-live
//!
//! The schema is created (idempotently) when a database is opened.
//!
//! # Examples
//!
//! ```no_run
//! use shelf::{
//!   book::{BookMetadata, ReadingStatus},
//!   database::Database,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::open(Database::default_path()).await?;
//!
//! let metadata = BookMetadata {
//!   title:              "Dune".into(),
//!   authors:            vec!["Frank Herbert".into()],
//!   cover_url:          None,
//!   first_publish_year: Some(1965),
//! };
//! db.set_status("/works/OL893415W", ReadingStatus::ToRead, &metadata).await?;
//!
//! let counts = db.status_counts().await?;
//! println!("{} books to read", counts.to_read);
//! # Ok(())
//! # }
//! ```

use rusqlite::params;
use tokio_rusqlite::Connection;

use super::*;

mod cache;
mod status;
#[cfg(test)] mod tests;

pub use self::cache::cache_key;

/// Handle for the shelf database.
///
/// Wraps an async SQLite connection. Cloning is cheap and every clone talks to the
/// same underlying connection.
#[derive(Clone)]
pub struct Database {
  /// Async SQLite connection handle
  conn: Connection,
}

impl Database {
  /// Opens an existing database or creates a new one at the specified path.
  ///
  /// This method will:
  /// 1. Create the parent directory and the database file if needed
  /// 2. Initialize the schema
  ///
  /// # Examples
  ///
  /// ```no_run
  /// # use shelf::database::Database;
  /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
  /// let db = Database::open("shelf.db").await?;
  /// # Ok(())
  /// # }
  /// ```
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(parent).await?;
    }
    debug!("Opening database at {}", path.display());
    let conn = Connection::open(path).await?;

    conn
      .call(|conn| {
        conn.execute_batch(include_str!(concat!(
          env!("CARGO_MANIFEST_DIR"),
          "/migrations/init.sql"
        )))?;
        Ok(())
      })
      .await?;

    Ok(Self { conn })
  }

  /// Returns the default path for the database file.
  ///
  /// - On Unix: `~/.local/share/shelf/shelf.db`
  /// - On macOS: `~/Library/Application Support/shelf/shelf.db`
  /// - On Windows: `%APPDATA%\shelf\shelf.db`
  /// - Fallback: `./shelf/shelf.db`
  pub fn default_path() -> PathBuf {
    dirs::data_dir().unwrap_or_else(|| PathBuf::from(".")).join("shelf").join("shelf.db")
  }
}

/// Wraps a conversion failure so it can surface from inside a row mapper.
fn conversion_error(
  column: usize,
  e: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
  rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
}
