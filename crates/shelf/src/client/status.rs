//! Status changes with undo, and the per-status library view.
//!
//! A change is a two-step protocol: the remote record is written first, and only
//! once that succeeds is local state touched and a [`ToastData`] emitted. Undoing
//! replays the inverse remote mutation recorded in the toast.

use super::*;

/// Sets the status of every book in `books` matching `work_key`.
///
/// Returns whether any book was found.
pub fn patch_status(books: &mut [Book], work_key: &str, status: Option<ReadingStatus>) -> bool {
  let mut found = false;
  for book in books.iter_mut().filter(|book| book.work_key == work_key) {
    book.status = status;
    found = true;
  }
  found
}

/// One tab of the library: the books carrying a status, plus counts for every tab.
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryView {
  /// Status whose books are listed
  pub active:     ReadingStatus,
  /// Books in the active tab
  pub books:      Vec<Book>,
  /// Books per status, for the tab badges
  pub counts:     StatusCounts,
  /// A load is in progress
  pub is_loading: bool,
  /// User-facing message of the last failed load
  pub error:      Option<String>,
}

impl LibraryView {
  /// An empty view of the `active` tab.
  pub fn new(active: ReadingStatus) -> Self {
    Self {
      active,
      books: Vec::new(),
      counts: StatusCounts::default(),
      is_loading: false,
      error: None,
    }
  }

  /// Switches to `status` and fetches its books along with the counts.
  pub async fn load(&mut self, api: &dyn ShelfApi, status: ReadingStatus) -> Result<()> {
    self.active = status;
    self.is_loading = true;
    self.error = None;

    let outcome = tokio::try_join!(api.library(status), api.counts());
    self.is_loading = false;
    match outcome {
      Ok((page, counts)) => {
        debug!("Library tab {} holds {} books", status.slug(), page.total);
        self.books = page.books;
        self.counts = counts;
        Ok(())
      },
      Err(e) => {
        error!("Failed to load library tab {}: {e}", status.slug());
        self.books.clear();
        self.error = Some(e.user_message());
        Err(e)
      },
    }
  }

  /// Fetches the active tab again.
  pub async fn reload(&mut self, api: &dyn ShelfApi) -> Result<()> {
    self.load(api, self.active).await
  }

  /// Reflects a successful status change in the listing.
  ///
  /// A book moved to another status leaves the tab, and the counts follow it.
  pub fn apply_status_change(&mut self, work_key: &str, new_status: ReadingStatus) {
    if new_status == self.active {
      patch_status(&mut self.books, work_key, Some(new_status));
      return;
    }

    let before = self.books.len();
    self.books.retain(|book| book.work_key != work_key);
    if self.books.len() < before {
      self.counts.decrement(self.active);
      self.counts.increment(new_status);
    }
  }
}

/// Performs status changes and their undo, announcing each change with a toast.
pub struct StatusFlow {
  api:     Arc<dyn ShelfApi>,
  toaster: Toaster,
}

impl StatusFlow {
  /// A flow using the default toast duration.
  pub fn new(api: Arc<dyn ShelfApi>) -> Self { Self::with_toaster(api, Toaster::new()) }

  /// A flow announcing changes through `toaster`.
  pub fn with_toaster(api: Arc<dyn ShelfApi>, toaster: Toaster) -> Self { Self { api, toaster } }

  /// The toaster showing undo notifications.
  pub fn toaster(&self) -> &Toaster { &self.toaster }

  /// Sets the status of `work_key` to `new_status`.
  ///
  /// `previous_status` is what the book showed before the change; it is recorded in
  /// the returned toast so the change can be undone. On failure nothing is shown and
  /// the error is logged and returned.
  pub async fn change_status(
    &mut self,
    work_key: &str,
    new_status: ReadingStatus,
    previous_status: Option<ReadingStatus>,
    metadata: &BookMetadata,
  ) -> Result<ToastData> {
    let update = StatusUpdate { status: new_status, metadata: metadata.clone() };
    if let Err(e) = self.api.put_status(work_key, &update).await {
      error!("Failed to set {work_key} to {new_status}: {e}");
      return Err(e);
    }
    info!("Set {work_key} to {new_status} (was {previous_status:?})");

    let toast = ToastData {
      id: self.toaster.next_id(),
      book_title: metadata.title.clone(),
      new_status,
      work_key: work_key.to_string(),
      previous_status,
      metadata: metadata.clone(),
    };
    self.toaster.show(toast.clone());
    Ok(toast)
  }

  /// Reverts the change recorded in `toast`.
  ///
  /// The toast is dismissed before the revert is sent, so a second undo of the same
  /// toast cannot be triggered from the view. Returns the status the book has
  /// afterwards.
  pub async fn undo(&mut self, toast: &ToastData) -> Result<Option<ReadingStatus>> {
    self.toaster.dismiss(toast.id);

    let outcome = match toast.previous_status {
      None => self.api.delete_status(&toast.work_key).await,
      Some(previous) => {
        let update = StatusUpdate { status: previous, metadata: toast.metadata.clone() };
        self.api.put_status(&toast.work_key, &update).await.map(|_| ())
      },
    };

    match outcome {
      Ok(()) => {
        info!("Restored {} to {:?}", toast.work_key, toast.previous_status);
        Ok(toast.previous_status)
      },
      Err(e) => {
        error!("Failed to undo status change of {}: {e}", toast.work_key);
        Err(e)
      },
    }
  }
}
