//! Cancellable catalog search.
//!
//! Every call to [`SearchController::search`] supersedes the one before it. The
//! superseded request is signalled to stop and settles with
//! [`ShelfError::Cancelled`], which is dropped without touching the state. Since the
//! signal can race with a response that is already on its way, every request also
//! carries a generation number that is checked under the state lock. A response
//! only lands if its generation is still the current one.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::{
  sync::{oneshot, watch},
  task::JoinHandle,
};

use super::*;

/// Page size used for every search issued by the controller.
pub const SEARCH_LIMIT: u32 = 100;

/// What a search view renders.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
  /// Trimmed query the state belongs to
  pub query:        String,
  /// Books on the current page
  pub books:        Vec<Book>,
  /// Total number of matches
  pub total:        u64,
  /// Current page (1-indexed)
  pub page:         u32,
  /// Number of pages
  pub total_pages:  u32,
  /// A request is in flight
  pub is_loading:   bool,
  /// User-facing message of the last failed search
  pub error:        Option<String>,
  /// A search has completed, successfully or not
  pub has_searched: bool,
}

impl Default for SearchState {
  fn default() -> Self {
    Self {
      query:        String::new(),
      books:        Vec::new(),
      total:        0,
      page:         1,
      total_pages:  0,
      is_loading:   false,
      error:        None,
      has_searched: false,
    }
  }
}

/// Issues searches and maps their outcome into a [`SearchState`].
///
/// Requests run on spawned tasks; the state is published through a watch channel
/// so renderers can follow along with [`subscribe`](SearchController::subscribe).
pub struct SearchController {
  api:        Arc<dyn ShelfApi>,
  state:      Arc<watch::Sender<SearchState>>,
  generation: Arc<AtomicU64>,
  in_flight:  Option<oneshot::Sender<()>>,
  last:       Option<SearchQuery>,
}

impl SearchController {
  /// Creates a controller in the initial, empty state.
  pub fn new(api: Arc<dyn ShelfApi>) -> Self {
    let (state, _) = watch::channel(SearchState::default());
    Self {
      api,
      state: Arc::new(state),
      generation: Arc::new(AtomicU64::new(0)),
      in_flight: None,
      last: None,
    }
  }

  /// Searches for `query` at `page`, superseding any search still in flight.
  ///
  /// A blank query resets the state without a request and returns `None`.
  /// Otherwise the state switches to loading and the handle of the spawned request
  /// is returned. A superseded request still runs its task to completion, it just
  /// leaves the state alone.
  pub fn search(&mut self, query: &str, page: u32) -> Option<JoinHandle<()>> {
    self.cancel();
    let generation = self.generation.load(Ordering::SeqCst);

    let query = SearchQuery::new(query, page);
    if query.is_empty() {
      self.last = None;
      self.state.send_replace(SearchState::default());
      return None;
    }
    self.last = Some(query.clone());

    let text = query.trimmed().to_string();
    self.state.send_modify(|state| {
      state.query = text.clone();
      state.is_loading = true;
      state.error = None;
    });

    let api = Arc::clone(&self.api);
    let state = Arc::clone(&self.state);
    let current = Arc::clone(&self.generation);
    let (cancel, cancelled) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
      // Dropping the sender counts as a cancellation too
      let outcome = tokio::select! {
        outcome = api.search(&text, query.page, SEARCH_LIMIT) => outcome,
        _ = cancelled => Err(ShelfError::Cancelled),
      };

      state.send_if_modified(|state| {
        match outcome {
          Err(e) if e.is_cancelled() => {
            trace!("Search for {text:?} was cancelled");
            false
          },
          _ if current.load(Ordering::SeqCst) != generation => {
            trace!("Discarding superseded search for {text:?}");
            false
          },
          Ok(result) => {
            debug!("Search {text:?} page {} returned {} books", result.page, result.books.len());
            *state = SearchState {
              query:        text,
              books:        result.books,
              total:        result.total,
              page:         result.page,
              total_pages:  result.total_pages,
              is_loading:   false,
              error:        None,
              has_searched: true,
            };
            true
          },
          Err(e) => {
            warn!("Search {text:?} failed: {e}");
            state.is_loading = false;
            state.error = Some(e.user_message());
            state.has_searched = true;
            true
          },
        }
      });
    });

    self.in_flight = Some(cancel);
    Some(handle)
  }

  /// Replays the last search, same query and page.
  pub fn retry(&mut self) -> Option<JoinHandle<()>> {
    let last = self.last.clone()?;
    self.search(&last.text, last.page)
  }

  /// Searches the current query at another page.
  pub fn set_page(&mut self, page: u32) -> Option<JoinHandle<()>> {
    let last = self.last.clone()?;
    self.search(&last.text, page)
  }

  /// Signals the search in flight, if any, to stop and fences off its response.
  ///
  /// The state is left as it is, including a pending loading flag.
  pub fn cancel(&mut self) {
    self.generation.fetch_add(1, Ordering::SeqCst);
    if let Some(cancel) = self.in_flight.take() {
      // The task may already be done
      let _ = cancel.send(());
    }
  }

  /// Sets the status of a displayed book, returning whether it was on the page.
  pub fn patch_book_status(&self, work_key: &str, status: Option<ReadingStatus>) -> bool {
    self.state.send_if_modified(|state| patch_status(&mut state.books, work_key, status))
  }

  /// A snapshot of the current state.
  pub fn state(&self) -> SearchState { self.state.borrow().clone() }

  /// A receiver notified on every state change.
  pub fn subscribe(&self) -> watch::Receiver<SearchState> { self.state.subscribe() }
}

impl Drop for SearchController {
  fn drop(&mut self) { self.cancel(); }
}
