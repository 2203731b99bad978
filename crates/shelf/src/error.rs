//! Error types for the shelf library.
//!
//! This module provides a single error type that covers every failure mode of the
//! library, including:
//! - Catalog (OpenLibrary) requests and their timeouts
//! - Calls to a running shelf server made through [`HttpApi`](crate::client::HttpApi)
//! - Database operations
//! - Input validation
//! - Cooperative cancellation of superseded requests
//!
//! # Examples
//!
//! ```no_run
//! use shelf::{error::ShelfError, Config, Shelf};
//!
//! # async fn example() -> Result<(), ShelfError> {
//! let shelf = Shelf::open(Config::default()).await?;
//! match shelf.search("dune", 1, 100).await {
//!   Err(ShelfError::CatalogTimeout) => println!("OpenLibrary is slow today"),
//!   Err(e) => println!("Other error: {}", e),
//!   Ok(result) => println!("{} books", result.total),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

/// Error type alias used for the [`shelf`](crate) crate.
pub type Result<T> = core::result::Result<T, ShelfError>;

/// Message shown to a user when a search fails without a more specific explanation.
pub const GENERIC_SEARCH_ERROR: &str = "Failed to search books. Please try again.";

/// Errors that can occur when working with the shelf library.
#[derive(Error, Debug)]
pub enum ShelfError {
  /// A network request failed before a response was received.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// The catalog did not answer within the configured timeout.
  #[error("Request to OpenLibrary timed out")]
  CatalogTimeout,

  /// The catalog answered with a non-success status code.
  #[error("OpenLibrary API error: {0}")]
  CatalogStatus(u16),

  /// The catalog could not be reached at all.
  #[error("Failed to connect to OpenLibrary: {0}")]
  CatalogUnavailable(String),

  /// A shelf server answered with a non-success status.
  ///
  /// The `detail` carries the human-readable message from the response body when
  /// the server supplied one.
  #[error("API error ({status}): {}", detail.as_deref().unwrap_or("no detail"))]
  ApiError {
    /// HTTP status code of the failed response
    status: u16,
    /// Optional human-readable message from the response body
    detail: Option<String>,
  },

  /// The requested status record does not exist.
  #[error("Book status not found")]
  NotFound,

  /// A request was rejected during validation.
  #[error("{0}")]
  InvalidRequest(String),

  /// A reading status string could not be parsed.
  #[error("Invalid status '{0}'. Valid values: to_read, did_not_finish, completed")]
  InvalidStatus(String),

  /// A work key was empty or malformed.
  #[error("Invalid work key '{0}'")]
  InvalidWorkKey(String),

  /// A library slug could not be parsed.
  #[error("Invalid status '{0}'. Valid values: to-read, did-not-finish, completed")]
  InvalidSlug(String),

  /// The work was superseded or torn down before it finished.
  ///
  /// This is an expected outcome and should never be shown to a user.
  #[error("Operation was cancelled")]
  Cancelled,

  /// A SQLite operation failed.
  #[error(transparent)]
  Sqlite(#[from] rusqlite::Error),

  /// An async SQLite operation failed.
  #[error(transparent)]
  AsyncSqlite(#[from] tokio_rusqlite::Error),

  /// JSON could not be encoded or decoded.
  #[error(transparent)]
  Json(#[from] serde_json::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// A URL could not be parsed.
  #[error(transparent)]
  Url(#[from] url::ParseError),

  /// A file system operation failed.
  #[error(transparent)]
  Path(#[from] std::io::Error),
}

impl ShelfError {
  /// Whether this error only signals that the work was superseded.
  pub fn is_cancelled(&self) -> bool { matches!(self, Self::Cancelled) }

  /// Whether the remote side reported that the resource does not exist.
  pub fn is_not_found(&self) -> bool {
    matches!(self, Self::NotFound | Self::ApiError { status: 404, .. })
  }

  /// The message to show in an error view.
  ///
  /// Server-provided details are surfaced verbatim, everything else falls back to
  /// [`GENERIC_SEARCH_ERROR`].
  pub fn user_message(&self) -> String {
    match self {
      Self::ApiError { detail: Some(detail), .. } => detail.clone(),
      _ => GENERIC_SEARCH_ERROR.to_string(),
    }
  }
}
