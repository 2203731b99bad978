//! In-memory [`ShelfApi`] for exercising the client logic without a server.

use std::{
  collections::HashMap,
  sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
  },
};

use super::*;

/// Canned answer for one search query.
#[derive(Clone)]
struct Scripted {
  delay:  Duration,
  answer: std::result::Result<Vec<Book>, Option<String>>,
}

/// Scriptable backend keeping statuses in memory and recording every search.
#[derive(Default)]
pub struct FakeApi {
  statuses:       Mutex<HashMap<String, StatusRecord>>,
  scripts:        Mutex<HashMap<String, Scripted>>,
  searches:       Mutex<Vec<(String, u32)>>,
  fail_mutations: AtomicBool,
}

impl FakeApi {
  pub fn new() -> Arc<Self> { Arc::new(Self::default()) }

  /// Answers `query` with `books` after `delay`.
  pub fn respond(&self, query: &str, delay: Duration, books: Vec<Book>) {
    self
      .scripts
      .lock()
      .unwrap()
      .insert(query.to_string(), Scripted { delay, answer: Ok(books) });
  }

  /// Fails `query` with a server error carrying `detail`.
  pub fn fail(&self, query: &str, detail: Option<&str>) {
    self.scripts.lock().unwrap().insert(query.to_string(), Scripted {
      delay:  Duration::ZERO,
      answer: Err(detail.map(str::to_string)),
    });
  }

  /// Makes every status mutation fail until switched off again.
  pub fn fail_mutations(&self, fail: bool) { self.fail_mutations.store(fail, Ordering::SeqCst); }

  /// Every search received so far, as `(query, page)`.
  pub fn searches(&self) -> Vec<(String, u32)> { self.searches.lock().unwrap().clone() }

  /// Current status of a work.
  pub fn status_of(&self, work_key: &str) -> Option<ReadingStatus> {
    self.statuses.lock().unwrap().get(work_key).map(|record| record.status)
  }

  /// Stored metadata of a work.
  pub fn metadata_of(&self, work_key: &str) -> Option<BookMetadata> {
    self.statuses.lock().unwrap().get(work_key).map(|record| record.metadata.clone())
  }

  fn check_mutations(&self) -> Result<()> {
    if self.fail_mutations.load(Ordering::SeqCst) {
      return Err(ShelfError::ApiError { status: 500, detail: Some("Database is locked".into()) });
    }
    Ok(())
  }
}

/// A search hit with a predictable work key.
pub fn book(id: u32, title: &str) -> Book {
  Book {
    work_key:           format!("/works/OL{id}W"),
    title:              title.to_string(),
    authors:            vec![format!("Author {id}")],
    cover_url:          None,
    first_publish_year: Some(1900 + id as i32),
    status:             None,
  }
}

#[async_trait]
impl ShelfApi for FakeApi {
  async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchResult> {
    self.searches.lock().unwrap().push((query.to_string(), page));
    let script = self.scripts.lock().unwrap().get(query).cloned();
    let Some(script) = script else {
      return Ok(SearchResult { books: Vec::new(), total: 0, page, total_pages: 0 });
    };

    tokio::time::sleep(script.delay).await;
    match script.answer {
      Ok(mut books) => {
        let statuses = self.statuses.lock().unwrap();
        for book in &mut books {
          book.status = statuses.get(&book.work_key).map(|record| record.status);
        }
        let total = books.len() as u64;
        Ok(SearchResult { books, total, page, total_pages: total_pages(total, limit) })
      },
      Err(detail) => Err(ShelfError::ApiError { status: 502, detail }),
    }
  }

  async fn get_status(&self, work_key: &str) -> Result<Option<StatusRecord>> {
    Ok(self.statuses.lock().unwrap().get(work_key).cloned())
  }

  async fn put_status(&self, work_key: &str, update: &StatusUpdate) -> Result<StatusRecord> {
    self.check_mutations()?;
    let now = Utc::now();
    let mut statuses = self.statuses.lock().unwrap();
    let created_at = statuses.get(work_key).map_or(now, |record| record.created_at);
    let record = StatusRecord {
      work_key: work_key.to_string(),
      status: update.status,
      metadata: update.metadata.clone(),
      created_at,
      updated_at: now,
    };
    statuses.insert(work_key.to_string(), record.clone());
    Ok(record)
  }

  async fn delete_status(&self, work_key: &str) -> Result<()> {
    self.check_mutations()?;
    self.statuses.lock().unwrap().remove(work_key);
    Ok(())
  }

  async fn list_statuses(&self) -> Result<Vec<StatusRecord>> {
    let mut records: Vec<_> = self.statuses.lock().unwrap().values().cloned().collect();
    records.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    Ok(records)
  }

  async fn library(&self, status: ReadingStatus) -> Result<LibraryPage> {
    let books: Vec<Book> = self
      .list_statuses()
      .await?
      .into_iter()
      .filter(|record| record.status == status)
      .map(StatusRecord::into_book)
      .collect();
    Ok(LibraryPage { total: books.len() as u64, books })
  }

  async fn counts(&self) -> Result<StatusCounts> {
    let mut counts = StatusCounts::default();
    for record in self.statuses.lock().unwrap().values() {
      counts.increment(record.status);
    }
    Ok(counts)
  }
}
