//! Reading status records.

use std::collections::HashMap;

use super::*;

/// Columns selected for a full status record, in [`record_from_row`] order.
const RECORD_COLUMNS: &str = "s.openlibrary_work_key, s.status, b.title, b.author_name, \
                              b.cover_url, b.first_publish_year, s.created_at, s.updated_at";

/// Maps a row selected with [`RECORD_COLUMNS`] onto a [`StatusRecord`].
fn record_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StatusRecord> {
  let status = row.get::<_, String>(1)?.parse::<ReadingStatus>().map_err(|e| conversion_error(1, e))?;
  let authors: Vec<String> =
    serde_json::from_str(&row.get::<_, String>(3)?).map_err(|e| conversion_error(3, e))?;

  Ok(StatusRecord {
    work_key: row.get(0)?,
    status,
    metadata: BookMetadata {
      title: row.get(2)?,
      authors,
      cover_url: row.get(4)?,
      first_publish_year: row.get(5)?,
    },
    created_at: row.get(6)?,
    updated_at: row.get(7)?,
  })
}

impl Database {
  /// Looks up the status record for a work.
  ///
  /// Returns `None` when the work has no status.
  pub async fn get_status(&self, work_key: &str) -> Result<Option<StatusRecord>> {
    let work_key = work_key.to_string();
    self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "SELECT {RECORD_COLUMNS}
           FROM book_statuses s
           JOIN books b ON b.openlibrary_work_key = s.openlibrary_work_key
           WHERE s.openlibrary_work_key = ?1"
        ))?;

        match stmt.query_row([work_key], record_from_row) {
          Ok(record) => Ok(Some(record)),
          Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
          Err(e) => Err(e.into()),
        }
      })
      .await
      .map_err(ShelfError::from)
  }

  /// Creates or updates the status of a work.
  ///
  /// The book metadata is refreshed on every call. `created_at` is kept from the
  /// first assignment while `updated_at` moves forward.
  pub async fn set_status(
    &self,
    work_key: &str,
    status: ReadingStatus,
    metadata: &BookMetadata,
  ) -> Result<StatusRecord> {
    let work_key = work_key.to_string();
    let metadata = metadata.clone();
    let authors = serde_json::to_string(&metadata.authors)?;
    let now = Utc::now();

    let record = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "INSERT INTO books (openlibrary_work_key, title, author_name, cover_url, first_publish_year)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(openlibrary_work_key) DO UPDATE SET
             title = excluded.title,
             author_name = excluded.author_name,
             cover_url = excluded.cover_url,
             first_publish_year = excluded.first_publish_year",
          params![
            work_key,
            metadata.title,
            authors,
            metadata.cover_url,
            metadata.first_publish_year
          ],
        )?;

        tx.execute(
          "INSERT INTO book_statuses (openlibrary_work_key, status, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)
           ON CONFLICT(openlibrary_work_key) DO UPDATE SET
             status = excluded.status,
             updated_at = excluded.updated_at",
          params![work_key, status.as_str(), now],
        )?;

        let record = tx.query_row(
          &format!(
            "SELECT {RECORD_COLUMNS}
             FROM book_statuses s
             JOIN books b ON b.openlibrary_work_key = s.openlibrary_work_key
             WHERE s.openlibrary_work_key = ?1"
          ),
          [&work_key],
          record_from_row,
        )?;

        tx.commit()?;
        Ok(record)
      })
      .await?;

    debug!("Set status of {} to {}", record.work_key, record.status);
    Ok(record)
  }

  /// Removes the status of a work together with its stored metadata.
  ///
  /// Returns `false` when the work had no status.
  pub async fn delete_status(&self, work_key: &str) -> Result<bool> {
    let work_key = work_key.to_string();
    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let removed =
          tx.execute("DELETE FROM book_statuses WHERE openlibrary_work_key = ?1", [&work_key])?;
        tx.execute("DELETE FROM books WHERE openlibrary_work_key = ?1", [&work_key])?;
        tx.commit()?;
        Ok(removed > 0)
      })
      .await?;
    Ok(deleted)
  }

  /// Every status record, most recently updated first.
  pub async fn list_statuses(&self) -> Result<Vec<StatusRecord>> {
    self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "SELECT {RECORD_COLUMNS}
           FROM book_statuses s
           JOIN books b ON b.openlibrary_work_key = s.openlibrary_work_key
           ORDER BY s.updated_at DESC, s.rowid DESC"
        ))?;
        let records = stmt.query_map([], record_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
      })
      .await
      .map_err(ShelfError::from)
  }

  /// Statuses for a batch of works. Works without a status are left out.
  pub async fn statuses_for(&self, work_keys: &[String]) -> Result<HashMap<String, ReadingStatus>> {
    if work_keys.is_empty() {
      return Ok(HashMap::new());
    }

    let work_keys = work_keys.to_vec();
    self
      .conn
      .call(move |conn| {
        let placeholders = vec!["?"; work_keys.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
          "SELECT openlibrary_work_key, status FROM book_statuses
           WHERE openlibrary_work_key IN ({placeholders})"
        ))?;

        let rows = stmt.query_map(rusqlite::params_from_iter(work_keys.iter()), |row| {
          let status =
            row.get::<_, String>(1)?.parse::<ReadingStatus>().map_err(|e| conversion_error(1, e))?;
          Ok((row.get::<_, String>(0)?, status))
        })?;

        Ok(rows.collect::<rusqlite::Result<HashMap<_, _>>>()?)
      })
      .await
      .map_err(ShelfError::from)
  }

  /// Books carrying `status`, most recently updated first.
  pub async fn books_by_status(&self, status: ReadingStatus) -> Result<Vec<Book>> {
    let records = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(&format!(
          "SELECT {RECORD_COLUMNS}
           FROM book_statuses s
           JOIN books b ON b.openlibrary_work_key = s.openlibrary_work_key
           WHERE s.status = ?1
           ORDER BY s.updated_at DESC, s.rowid DESC"
        ))?;
        let records =
          stmt.query_map([status.as_str()], record_from_row)?.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
      })
      .await?;

    Ok(records.into_iter().map(StatusRecord::into_book).collect())
  }

  /// Number of books in each status.
  pub async fn status_counts(&self) -> Result<StatusCounts> {
    self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare_cached("SELECT status, COUNT(*) FROM book_statuses GROUP BY status")?;
        let mut rows = stmt.query([])?;

        let mut counts = StatusCounts::default();
        while let Some(row) = rows.next()? {
          let status =
            row.get::<_, String>(0)?.parse::<ReadingStatus>().map_err(|e| conversion_error(0, e))?;
          let count = u64::try_from(row.get::<_, i64>(1)?).unwrap_or_default();
          match status {
            ReadingStatus::ToRead => counts.to_read = count,
            ReadingStatus::DidNotFinish => counts.did_not_finish = count,
            ReadingStatus::Completed => counts.completed = count,
          }
        }
        Ok(counts)
      })
      .await
      .map_err(ShelfError::from)
  }
}
