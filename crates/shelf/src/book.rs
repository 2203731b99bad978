//! Core book types shared by the catalog, the database, the server and the client.
//!
//! The JSON shape of these types is the wire contract between the shelf server and
//! any client talking to it, so field names follow the OpenLibrary vocabulary
//! (`openlibrary_work_key`, `author_name`, ...) rather than Rust naming.
//!
//! # Examples
//!
//! ```
//! use shelf::book::{Book, ReadingStatus};
//!
//! let status: ReadingStatus = "did_not_finish".parse().unwrap();
//! assert_eq!(status.slug(), "did-not-finish");
//! assert_eq!(ReadingStatus::from_slug("completed").unwrap(), ReadingStatus::Completed);
//! ```

use super::*;

/// Reading progress of a single work.
///
/// A book carries at most one status at a time; "no status" is represented by
/// `Option::None` wherever a status is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
  /// On the reading list
  ToRead,
  /// Started and abandoned
  DidNotFinish,
  /// Read to the end
  Completed,
}

impl ReadingStatus {
  /// Every status, in the order the library tabs show them.
  pub const ALL: [ReadingStatus; 3] =
    [ReadingStatus::ToRead, ReadingStatus::DidNotFinish, ReadingStatus::Completed];

  /// The storage and JSON form, e.g. `did_not_finish`.
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::ToRead => "to_read",
      Self::DidNotFinish => "did_not_finish",
      Self::Completed => "completed",
    }
  }

  /// The URL form used in library paths, e.g. `did-not-finish`.
  pub fn slug(&self) -> &'static str {
    match self {
      Self::ToRead => "to-read",
      Self::DidNotFinish => "did-not-finish",
      Self::Completed => "completed",
    }
  }

  /// Parses the URL form of a status.
  pub fn from_slug(slug: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|status| status.slug() == slug)
      .ok_or_else(|| ShelfError::InvalidSlug(slug.to_string()))
  }

  /// Short human label for notifications and terminal output.
  pub fn label(&self) -> &'static str {
    match self {
      Self::ToRead => "To Read",
      Self::DidNotFinish => "Didn't Finish",
      Self::Completed => "Completed",
    }
  }
}

impl Display for ReadingStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for ReadingStatus {
  type Err = ShelfError;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|status| status.as_str() == s)
      .ok_or_else(|| ShelfError::InvalidStatus(s.to_string()))
  }
}

/// A book as shown in search results and library listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
  /// OpenLibrary work key, e.g. `/works/OL27448W`
  #[serde(rename = "openlibrary_work_key")]
  pub work_key:           String,
  /// Book title
  pub title:              String,
  /// Author names in catalog order
  #[serde(rename = "author_name", default)]
  pub authors:            Vec<String>,
  /// Cover image URL, when the catalog knows one
  #[serde(default)]
  pub cover_url:          Option<String>,
  /// Year of first publication
  #[serde(default)]
  pub first_publish_year: Option<i32>,
  /// Reading status, when one has been set
  #[serde(default)]
  pub status:             Option<ReadingStatus>,
}

impl Book {
  /// The denormalized metadata sent along with a status upsert.
  pub fn metadata(&self) -> BookMetadata {
    BookMetadata {
      title:              self.title.clone(),
      authors:            self.authors.clone(),
      cover_url:          self.cover_url.clone(),
      first_publish_year: self.first_publish_year,
    }
  }
}

/// Catalog metadata stored alongside a status so the library can be shown without
/// asking the catalog again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookMetadata {
  /// Book title
  pub title:              String,
  /// Author names
  #[serde(rename = "author_name", default)]
  pub authors:            Vec<String>,
  /// Cover image URL
  #[serde(default)]
  pub cover_url:          Option<String>,
  /// Year of first publication
  #[serde(default)]
  pub first_publish_year: Option<i32>,
}

/// Body of a status upsert request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
  /// The status to set
  pub status:   ReadingStatus,
  /// Metadata of the book the status belongs to
  #[serde(flatten)]
  pub metadata: BookMetadata,
}

/// A persisted reading status together with its book metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
  /// OpenLibrary work key
  #[serde(rename = "openlibrary_work_key")]
  pub work_key:   String,
  /// Current status
  pub status:     ReadingStatus,
  /// Denormalized book metadata
  #[serde(flatten)]
  pub metadata:   BookMetadata,
  /// When the status was first set
  pub created_at: DateTime<Utc>,
  /// When the status was last changed
  pub updated_at: DateTime<Utc>,
}

impl StatusRecord {
  /// The record as a library book.
  pub fn into_book(self) -> Book {
    Book {
      work_key:           self.work_key,
      title:              self.metadata.title,
      authors:            self.metadata.authors,
      cover_url:          self.metadata.cover_url,
      first_publish_year: self.metadata.first_publish_year,
      status:             Some(self.status),
    }
  }
}

/// Envelope for the list of every status record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusList {
  /// Records ordered by most recent update first
  pub statuses: Vec<StatusRecord>,
}

/// One page of catalog search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
  /// Books on this page
  pub books:       Vec<Book>,
  /// Total number of matches across all pages
  pub total:       u64,
  /// Current page (1-indexed)
  pub page:        u32,
  /// Number of pages at the requested page size
  pub total_pages: u32,
}

/// Number of pages needed for `total` results at `limit` results per page.
pub fn total_pages(total: u64, limit: u32) -> u32 {
  if limit == 0 {
    return 0;
  }
  let limit = u64::from(limit);
  u32::try_from(total.div_ceil(limit)).unwrap_or(u32::MAX)
}

/// The books of a single library tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryPage {
  /// Books carrying the requested status
  pub books: Vec<Book>,
  /// Number of books in this tab
  pub total: u64,
}

/// Number of books per reading status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
  /// Books to read
  pub to_read:        u64,
  /// Books not finished
  pub did_not_finish: u64,
  /// Books completed
  pub completed:      u64,
}

impl StatusCounts {
  /// The count for `status`.
  pub fn get(&self, status: ReadingStatus) -> u64 {
    match status {
      ReadingStatus::ToRead => self.to_read,
      ReadingStatus::DidNotFinish => self.did_not_finish,
      ReadingStatus::Completed => self.completed,
    }
  }

  fn slot(&mut self, status: ReadingStatus) -> &mut u64 {
    match status {
      ReadingStatus::ToRead => &mut self.to_read,
      ReadingStatus::DidNotFinish => &mut self.did_not_finish,
      ReadingStatus::Completed => &mut self.completed,
    }
  }

  /// Adds one book to `status`.
  pub fn increment(&mut self, status: ReadingStatus) { *self.slot(status) += 1; }

  /// Removes one book from `status`, never going below zero.
  pub fn decrement(&mut self, status: ReadingStatus) {
    let slot = self.slot(status);
    *slot = slot.saturating_sub(1);
  }
}

/// Text and page of a catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
  /// Raw query text as typed
  pub text: String,
  /// Requested page, at least 1
  pub page: u32,
}

impl SearchQuery {
  /// Creates a query, clamping the page to at least 1.
  pub fn new(text: impl Into<String>, page: u32) -> Self {
    Self { text: text.into(), page: page.max(1) }
  }

  /// The query text without surrounding whitespace.
  pub fn trimmed(&self) -> &str { self.text.trim() }

  /// Whether there is nothing to search for.
  pub fn is_empty(&self) -> bool { self.trimmed().is_empty() }
}
