//! OpenLibrary catalog client.
//!
//! The catalog is the external source of truth for books. This module issues
//! search requests against the OpenLibrary search API and normalizes its loosely
//! typed documents into [`Book`]s and [`SearchResult`]s.
//!
//! # Examples
//!
//! ```no_run
//! use shelf::{catalog::Catalog, Config};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new(&Config::default())?;
//! let raw = catalog.search_raw("the hobbit", 1, 100).await?;
//! let result = catalog.parse_search_response(&raw, 1, 100);
//! println!("{} books match", result.total);
//! # Ok(())
//! # }
//! ```

use serde_json::Value;

use super::*;

/// OpenLibrary search endpoint.
pub const OPENLIBRARY_SEARCH_URL: &str = "https://openlibrary.org/search.json";
/// OpenLibrary cover image service.
pub const OPENLIBRARY_COVER_URL: &str = "https://covers.openlibrary.org/b";

/// Title used when a catalog document has none.
const UNKNOWN_TITLE: &str = "Unknown Title";

/// Client for the OpenLibrary search API.
#[derive(Debug, Clone)]
pub struct Catalog {
  /// HTTP client carrying the configured timeout
  client:     reqwest::Client,
  /// Search endpoint
  search_url: String,
  /// Cover image base URL
  covers_url: String,
}

impl Catalog {
  /// Builds a client from the catalog settings in `config`.
  pub fn new(config: &Config) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.request_timeout())
      .user_agent(concat!("shelf/", env!("CARGO_PKG_VERSION")))
      .build()?;
    Ok(Self {
      client,
      search_url: config.catalog_url.clone(),
      covers_url: config.covers_url.trim_end_matches('/').to_string(),
    })
  }

  /// Runs a search and returns the raw catalog response.
  ///
  /// The raw form is what gets cached, so the normalization rules can change
  /// without invalidating the cache.
  ///
  /// # Errors
  ///
  /// - [`ShelfError::CatalogTimeout`] if the catalog did not answer in time
  /// - [`ShelfError::CatalogStatus`] if it answered with a non-success status
  /// - [`ShelfError::CatalogUnavailable`] if it could not be reached
  pub async fn search_raw(&self, query: &str, page: u32, limit: u32) -> Result<Value> {
    debug!("Searching catalog for {query:?} (page {page}, limit {limit})");
    let response = self
      .client
      .get(&self.search_url)
      .query(&[("q", query.to_string()), ("page", page.to_string()), ("limit", limit.to_string())])
      .send()
      .await
      .map_err(catalog_error)?;

    let status = response.status();
    if !status.is_success() {
      warn!("Catalog answered {status} for {query:?}");
      return Err(ShelfError::CatalogStatus(status.as_u16()));
    }

    let raw = response.json::<Value>().await.map_err(catalog_error)?;
    trace!("Catalog response: {raw}");
    Ok(raw)
  }

  /// Builds a cover URL for a catalog document.
  ///
  /// A non-zero `cover_i` wins; otherwise the first ISBN is used. Documents with
  /// neither have no cover.
  pub fn build_cover_url(&self, doc: &Value) -> Option<String> {
    if let Some(cover_id) = doc.get("cover_i").and_then(Value::as_i64).filter(|id| *id != 0) {
      return Some(format!("{}/id/{cover_id}-L.jpg", self.covers_url));
    }

    doc
      .get("isbn")
      .and_then(Value::as_array)
      .and_then(|isbns| isbns.first())
      .and_then(Value::as_str)
      .map(|isbn| format!("{}/isbn/{isbn}-L.jpg", self.covers_url))
  }

  /// Normalizes a single catalog document.
  pub fn parse_book(&self, doc: &Value) -> Book {
    Book {
      work_key:           doc.get("key").and_then(Value::as_str).unwrap_or_default().to_string(),
      title:              doc.get("title").and_then(Value::as_str).unwrap_or(UNKNOWN_TITLE).to_string(),
      authors:            doc
        .get("author_name")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).map(String::from).collect())
        .unwrap_or_default(),
      cover_url:          self.build_cover_url(doc),
      first_publish_year: doc
        .get("first_publish_year")
        .and_then(Value::as_i64)
        .and_then(|year| i32::try_from(year).ok()),
      status:             None,
    }
  }

  /// Normalizes a raw search response into one page of results.
  pub fn parse_search_response(&self, raw: &Value, page: u32, limit: u32) -> SearchResult {
    let total = raw
      .get("numFound")
      .or_else(|| raw.get("num_found"))
      .and_then(Value::as_u64)
      .unwrap_or_default();

    let books = raw
      .get("docs")
      .and_then(Value::as_array)
      .map(|docs| docs.iter().map(|doc| self.parse_book(doc)).collect())
      .unwrap_or_default();

    SearchResult { books, total, page, total_pages: total_pages(total, limit) }
  }
}

/// Maps a transport failure onto the catalog error taxonomy.
fn catalog_error(e: reqwest::Error) -> ShelfError {
  if e.is_timeout() {
    ShelfError::CatalogTimeout
  } else if let Some(status) = e.status() {
    ShelfError::CatalogStatus(status.as_u16())
  } else if e.is_decode() {
    ShelfError::Network(e)
  } else {
    ShelfError::CatalogUnavailable(e.to_string())
  }
}
