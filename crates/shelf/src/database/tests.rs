use chrono::TimeDelta;
use serde_json::json;

use super::*;

/// Helper function to set up a test database
async fn setup_test_db() -> (Database, PathBuf, tempfile::TempDir) {
  let dir = tempdir().unwrap();
  let path = dir.path().join("test.db");
  let db = Database::open(&path).await.unwrap();
  (db, path, dir)
}

fn metadata(title: &str, authors: &[&str]) -> BookMetadata {
  BookMetadata {
    title:              title.to_string(),
    authors:            authors.iter().map(|a| a.to_string()).collect(),
    cover_url:          None,
    first_publish_year: None,
  }
}

async fn table_exists(db: &Database, name: &'static str) -> bool {
  db.conn
    .call(move |conn| {
      Ok(
        conn
          .query_row(
            "SELECT name FROM sqlite_master WHERE type IN ('table', 'index') AND name = ?1",
            [name],
            |row| row.get::<_, String>(0),
          )
          .is_ok(),
      )
    })
    .await
    .unwrap()
}

#[traced_test]
#[tokio::test]
async fn test_database_creation() {
  let (db, path, _dir) = setup_test_db().await;
  assert!(path.exists());

  for name in ["search_cache", "books", "book_statuses", "idx_query_hash", "idx_expires_at"] {
    assert!(table_exists(&db, name).await, "missing {name}");
  }
}

#[traced_test]
#[tokio::test]
async fn test_open_is_idempotent() {
  let (db, path, _dir) = setup_test_db().await;
  db.set_status("/works/OL1W", ReadingStatus::ToRead, &metadata("Book", &["A"])).await.unwrap();
  drop(db);

  let db = Database::open(&path).await.unwrap();
  assert!(db.get_status("/works/OL1W").await.unwrap().is_some());
}

#[traced_test]
#[tokio::test]
async fn test_open_creates_parent_directories() {
  let dir = tempdir().unwrap();
  let path = dir.path().join("nested").join("deeper").join("shelf.db");
  Database::open(&path).await.unwrap();
  assert!(path.exists());
}

#[traced_test]
#[tokio::test]
async fn test_set_status_creates_record() {
  let (db, _path, _dir) = setup_test_db().await;
  let meta = BookMetadata {
    title:              "Test Book".into(),
    authors:            vec!["Author One".into(), "Author Two".into()],
    cover_url:          Some("https://example.com/cover.jpg".into()),
    first_publish_year: Some(2020),
  };

  let record = db.set_status("/works/OL123W", ReadingStatus::ToRead, &meta).await.unwrap();

  assert_eq!(record.work_key, "/works/OL123W");
  assert_eq!(record.status, ReadingStatus::ToRead);
  assert_eq!(record.metadata, meta);
  assert_eq!(record.created_at, record.updated_at);
}

#[traced_test]
#[tokio::test]
async fn test_set_status_updates_existing() {
  let (db, _path, _dir) = setup_test_db().await;
  let first =
    db.set_status("/works/OL123W", ReadingStatus::ToRead, &metadata("Test Book", &["Author One"]))
      .await
      .unwrap();

  let updated = db
    .set_status(
      "/works/OL123W",
      ReadingStatus::Completed,
      &metadata("Test Book Updated", &["Author One", "New Author"]),
    )
    .await
    .unwrap();

  assert_eq!(updated.status, ReadingStatus::Completed);
  assert_eq!(updated.metadata.title, "Test Book Updated");
  assert_eq!(updated.metadata.authors, vec!["Author One", "New Author"]);
  assert_eq!(updated.created_at, first.created_at);
  assert!(updated.updated_at >= first.updated_at);
}

#[traced_test]
#[tokio::test]
async fn test_get_missing_status() {
  let (db, _path, _dir) = setup_test_db().await;
  assert!(db.get_status("/works/NONEXISTENT").await.unwrap().is_none());
}

#[traced_test]
#[tokio::test]
async fn test_delete_status_removes_book() {
  let (db, _path, _dir) = setup_test_db().await;
  db.set_status("/works/OL123W", ReadingStatus::ToRead, &metadata("Test Book", &["A"]))
    .await
    .unwrap();

  assert!(db.delete_status("/works/OL123W").await.unwrap());
  assert!(db.get_status("/works/OL123W").await.unwrap().is_none());

  let books: i64 =
    db.conn.call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))?))
      .await
      .unwrap();
  assert_eq!(books, 0);

  assert!(!db.delete_status("/works/OL123W").await.unwrap());
}

#[traced_test]
#[tokio::test]
async fn test_list_statuses_most_recent_first() {
  let (db, _path, _dir) = setup_test_db().await;
  db.set_status("/works/OL1W", ReadingStatus::ToRead, &metadata("Book One", &["A"])).await.unwrap();
  db.set_status("/works/OL2W", ReadingStatus::Completed, &metadata("Book Two", &["B"]))
    .await
    .unwrap();

  let records = db.list_statuses().await.unwrap();
  let keys: Vec<_> = records.iter().map(|r| r.work_key.as_str()).collect();
  assert_eq!(keys, vec!["/works/OL2W", "/works/OL1W"]);
}

#[traced_test]
#[tokio::test]
async fn test_statuses_for_batch() {
  let (db, _path, _dir) = setup_test_db().await;
  db.set_status("/works/OL1W", ReadingStatus::ToRead, &metadata("Book One", &["A"])).await.unwrap();
  db.set_status("/works/OL2W", ReadingStatus::Completed, &metadata("Book Two", &["B"]))
    .await
    .unwrap();

  let keys = vec!["/works/OL1W".to_string(), "/works/OL2W".to_string(), "/works/OL3W".to_string()];
  let statuses = db.statuses_for(&keys).await.unwrap();

  assert_eq!(statuses.len(), 2);
  assert_eq!(statuses["/works/OL1W"], ReadingStatus::ToRead);
  assert_eq!(statuses["/works/OL2W"], ReadingStatus::Completed);
  assert!(db.statuses_for(&[]).await.unwrap().is_empty());
}

#[traced_test]
#[tokio::test]
async fn test_books_by_status_and_counts() {
  let (db, _path, _dir) = setup_test_db().await;
  assert_eq!(db.status_counts().await.unwrap(), StatusCounts::default());
  assert!(db.books_by_status(ReadingStatus::Completed).await.unwrap().is_empty());

  db.set_status("/works/OL1W", ReadingStatus::ToRead, &metadata("Book One", &["A"])).await.unwrap();
  db.set_status("/works/OL2W", ReadingStatus::Completed, &metadata("Book Two", &["B"]))
    .await
    .unwrap();
  db.set_status("/works/OL3W", ReadingStatus::ToRead, &metadata("Book Three", &["C"]))
    .await
    .unwrap();

  let to_read = db.books_by_status(ReadingStatus::ToRead).await.unwrap();
  let keys: Vec<_> = to_read.iter().map(|b| b.work_key.as_str()).collect();
  assert_eq!(keys, vec!["/works/OL3W", "/works/OL1W"]);
  assert!(to_read.iter().all(|b| b.status == Some(ReadingStatus::ToRead)));

  let counts = db.status_counts().await.unwrap();
  assert_eq!(counts, StatusCounts { to_read: 2, did_not_finish: 0, completed: 1 });
}

#[traced_test]
#[tokio::test]
async fn test_status_check_constraint() {
  let (db, _path, _dir) = setup_test_db().await;
  let result = db
    .conn
    .call(|conn| {
      conn.execute("INSERT INTO books (openlibrary_work_key, title) VALUES ('/works/X', 'X')", [])?;
      conn.execute(
        "INSERT INTO book_statuses (openlibrary_work_key, status, created_at, updated_at)
         VALUES ('/works/X', 'invalid_status', 'now', 'now')",
        [],
      )?;
      Ok(())
    })
    .await;
  assert!(result.is_err());
}

#[test]
fn test_cache_key_normalization() {
  let key = cache_key("test query", 1, 100);
  assert_eq!(key, cache_key("test query", 1, 100));
  assert_eq!(key, cache_key("  TEST Query ", 1, 100));
  assert_ne!(key, cache_key("test query", 2, 100));
  assert_ne!(key, cache_key("test query", 1, 50));
  assert_eq!(key.len(), 64);
  assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
}

#[traced_test]
#[tokio::test]
async fn test_cache_store_and_fetch() {
  let (db, _path, _dir) = setup_test_db().await;
  let response = json!({"numFound": 1, "docs": [{"key": "/works/OL1W", "title": "Cached"}]});

  assert!(db.cached_response("tolkien", 1, 100).await.unwrap().is_none());

  db.store_response("Tolkien", 1, 100, &response, TimeDelta::hours(24)).await.unwrap();
  assert_eq!(db.cached_response("tolkien", 1, 100).await.unwrap(), Some(response.clone()));

  // Replacing keeps a single entry
  let replacement = json!({"numFound": 0, "docs": []});
  db.store_response("tolkien", 1, 100, &replacement, TimeDelta::hours(24)).await.unwrap();
  assert_eq!(db.cached_response("TOLKIEN", 1, 100).await.unwrap(), Some(replacement));
  let entries: i64 = db
    .conn
    .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM search_cache", [], |row| row.get(0))?))
    .await
    .unwrap();
  assert_eq!(entries, 1);
}

#[traced_test]
#[tokio::test]
async fn test_cache_expiry() {
  let (db, _path, _dir) = setup_test_db().await;
  let response = json!({"numFound": 0, "docs": []});

  db.store_response("old", 1, 100, &response, TimeDelta::hours(-1)).await.unwrap();
  db.store_response("fresh", 1, 100, &response, TimeDelta::hours(1)).await.unwrap();

  assert!(db.cached_response("old", 1, 100).await.unwrap().is_none());
  assert_eq!(db.clear_expired_cache().await.unwrap(), 1);
  assert_eq!(db.clear_expired_cache().await.unwrap(), 0);
  assert!(db.cached_response("fresh", 1, 100).await.unwrap().is_some());
}

#[traced_test]
#[tokio::test]
async fn test_cache_invalidation() {
  let (db, _path, _dir) = setup_test_db().await;
  let response = json!({"numFound": 0, "docs": []});
  assert_eq!(db.clear_cache().await.unwrap(), 0);

  db.store_response("one", 1, 100, &response, TimeDelta::hours(1)).await.unwrap();
  db.store_response("two", 1, 100, &response, TimeDelta::hours(1)).await.unwrap();

  assert!(db.invalidate_response("one", 1, 100).await.unwrap());
  assert!(!db.invalidate_response("one", 1, 100).await.unwrap());
  assert_eq!(db.clear_cache().await.unwrap(), 1);
}
