//! Cache of raw catalog search responses.

use chrono::TimeDelta;
use serde_json::Value;
use sha2::{Digest, Sha256};

use super::*;

/// Cache key for a search request.
///
/// The query is trimmed and lowercased first, so `" Dune"` and `"dune"` share an
/// entry while different pages or page sizes do not.
pub fn cache_key(query: &str, page: u32, limit: u32) -> String {
  let normalized = query.trim().to_lowercase();
  hex::encode(Sha256::digest(format!("{normalized}:{page}:{limit}").as_bytes()))
}

impl Database {
  /// Returns the cached response for a request if one exists and has not expired.
  pub async fn cached_response(&self, query: &str, page: u32, limit: u32) -> Result<Option<Value>> {
    let query_hash = cache_key(query, page, limit);
    let now = Utc::now();

    let cached = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(
          "SELECT response_json FROM search_cache WHERE query_hash = ?1 AND expires_at > ?2",
        )?;
        match stmt.query_row(params![query_hash, now], |row| row.get::<_, String>(0)) {
          Ok(json) => Ok(Some(json)),
          Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match cached {
      Some(json) => {
        trace!("Cache hit for {query:?} page {page}");
        Ok(Some(serde_json::from_str(&json)?))
      },
      None => Ok(None),
    }
  }

  /// Stores a response, replacing any previous entry for the same request.
  pub async fn store_response(
    &self,
    query: &str,
    page: u32,
    limit: u32,
    response: &Value,
    ttl: TimeDelta,
  ) -> Result<()> {
    let query_hash = cache_key(query, page, limit);
    let query = query.to_string();
    let response_json = serde_json::to_string(response)?;
    let expires_at = Utc::now() + ttl;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT OR REPLACE INTO search_cache
             (query_hash, query, page, limit_val, response_json, expires_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          params![query_hash, query, page, limit, response_json, expires_at],
        )?;
        Ok(())
      })
      .await
      .map_err(ShelfError::from)
  }

  /// Drops the entry for one request. Returns whether an entry existed.
  pub async fn invalidate_response(&self, query: &str, page: u32, limit: u32) -> Result<bool> {
    let query_hash = cache_key(query, page, limit);
    self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM search_cache WHERE query_hash = ?1", [query_hash])? > 0)
      })
      .await
      .map_err(ShelfError::from)
  }

  /// Drops every cached response. Returns the number of entries removed.
  pub async fn clear_cache(&self) -> Result<usize> {
    self
      .conn
      .call(|conn| Ok(conn.execute("DELETE FROM search_cache", [])?))
      .await
      .map_err(ShelfError::from)
  }

  /// Drops expired responses. Returns the number of entries removed.
  pub async fn clear_expired_cache(&self) -> Result<usize> {
    let now = Utc::now();
    let removed = self
      .conn
      .call(move |conn| Ok(conn.execute("DELETE FROM search_cache WHERE expires_at <= ?1", [now])?))
      .await?;
    debug!("Removed {removed} expired cache entries");
    Ok(removed)
  }
}
