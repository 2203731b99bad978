//! Client-side interaction logic for a shelf front end.
//!
//! Everything a view needs beyond rendering lives here, written against the
//! [`ShelfApi`] trait so it runs the same against a remote server ([`HttpApi`]) or
//! an in-process [`Shelf`]:
//!
//! - [`Debouncer`]: collapses rapid input into one delayed value
//! - [`SearchController`]: cancellable search whose stale responses are never applied
//! - [`StatusFlow`] and [`Toaster`]: status changes with a time-boxed undo
//! - [`Router`]: keeps the [`Route`] and the browser history in step
//! - [`App`]: the view owner wiring the pieces together
//!
//! All state is owned by the view that created it and published through
//! [`tokio::sync::watch`] channels, so a renderer can subscribe to changes.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use shelf::client::{App, HttpApi, MemoryHistory};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(HttpApi::new("http://localhost:7000")?);
//! let mut app = App::new(api, MemoryHistory::new("/?q=dune"));
//! app.mount().await;
//!
//! app.type_query("dune messiah");
//! if let Some(search) = app.next_debounced().await {
//!   search.await?;
//! }
//! println!("{} results", app.search_state().total);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use super::*;

mod app;
mod debounce;
mod http;
mod router;
mod search;
mod status;
mod toast;

#[cfg(test)] pub(crate) mod fake;

pub use self::{
  app::{App, SEARCH_DEBOUNCE},
  debounce::Debouncer,
  http::HttpApi,
  router::{History, MemoryHistory, Route, Router},
  search::{SearchController, SearchState, SEARCH_LIMIT},
  status::{patch_status, LibraryView, StatusFlow},
  toast::{ToastData, Toaster, TOAST_DURATION},
};

/// The backend operations a client relies on.
///
/// Work keys are passed as-is; implementations decide how to carry them.
#[async_trait]
pub trait ShelfApi: Send + Sync {
  /// One page of catalog results.
  async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchResult>;

  /// The status record of a work, `None` if it has no status.
  async fn get_status(&self, work_key: &str) -> Result<Option<StatusRecord>>;

  /// Creates or updates the status of a work.
  async fn put_status(&self, work_key: &str, update: &StatusUpdate) -> Result<StatusRecord>;

  /// Removes the status of a work. Removing a missing status succeeds.
  async fn delete_status(&self, work_key: &str) -> Result<()>;

  /// Every status record, most recently updated first.
  async fn list_statuses(&self) -> Result<Vec<StatusRecord>>;

  /// The books of one library tab.
  async fn library(&self, status: ReadingStatus) -> Result<LibraryPage>;

  /// Number of books per status.
  async fn counts(&self) -> Result<StatusCounts>;
}

#[async_trait]
impl ShelfApi for Shelf {
  async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchResult> {
    Shelf::search(self, query, page, limit).await
  }

  async fn get_status(&self, work_key: &str) -> Result<Option<StatusRecord>> {
    Shelf::get_status(self, work_key).await
  }

  async fn put_status(&self, work_key: &str, update: &StatusUpdate) -> Result<StatusRecord> {
    self.set_status(work_key, update.status, &update.metadata).await
  }

  async fn delete_status(&self, work_key: &str) -> Result<()> {
    if !Shelf::delete_status(self, work_key).await? {
      debug!("No status to delete for {work_key}");
    }
    Ok(())
  }

  async fn list_statuses(&self) -> Result<Vec<StatusRecord>> { Shelf::list_statuses(self).await }

  async fn library(&self, status: ReadingStatus) -> Result<LibraryPage> {
    Shelf::library(self, status).await
  }

  async fn counts(&self) -> Result<StatusCounts> { self.status_counts().await }
}
