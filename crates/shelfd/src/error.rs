//! Error types for the shelf server and command line.

use thiserror::Error;

use super::*;

/// Result alias used throughout `shelfd`.
pub type Result<T> = core::result::Result<T, ShelfdError>;

/// Errors that can occur while running a command or the server.
#[derive(Error, Debug)]
pub enum ShelfdError {
  /// An operation of the shelf library failed.
  #[error(transparent)]
  Shelf(#[from] ShelfError),

  /// An interactive prompt failed.
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// A file pattern was malformed.
  #[error(transparent)]
  Glob(#[from] glob::PatternError),

  /// A file system or socket operation failed.
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// The address to listen on could not be parsed.
  #[error("Invalid bind address: {0}")]
  AddrParse(#[from] std::net::AddrParseError),

  /// The allowed browser origin is not a valid header value.
  #[error("Invalid allowed origin '{0}'")]
  InvalidOrigin(String),
}
