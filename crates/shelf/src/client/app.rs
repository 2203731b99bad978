//! The view owner tying search, status changes and routing together.

use tokio::{
  sync::{mpsc, watch},
  task::JoinHandle,
};

use super::*;

/// Quiet period before typed text is searched.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Shown when a status change or its undo fails without a server message.
const STATUS_ERROR: &str = "Failed to update reading status. Please try again.";

/// Application state for one client session.
///
/// `App` owns every piece of view state; nothing is shared globally. Events come in
/// through its methods (typing, navigation, status actions) and the resulting state
/// is read back through accessors or the watch channels of its parts.
///
/// Searches run in the background. Methods that start one return its handle, which
/// callers may await or drop.
pub struct App<H: History> {
  api:       Arc<dyn ShelfApi>,
  router:    Router<H>,
  search:    SearchController,
  library:   LibraryView,
  flow:      StatusFlow,
  debouncer: Debouncer<String>,
  debounced: mpsc::UnboundedReceiver<String>,
  input:     String,
  notice:    Option<String>,
}

impl<H: History> App<H> {
  /// Creates the app at the current location of `history`.
  ///
  /// Must be called from within a tokio runtime.
  pub fn new(api: Arc<dyn ShelfApi>, history: H) -> Self {
    Self::with_timing(api, history, SEARCH_DEBOUNCE, TOAST_DURATION)
  }

  /// Creates the app with custom debounce and toast durations.
  pub fn with_timing(
    api: Arc<dyn ShelfApi>,
    history: H,
    debounce: Duration,
    toast_duration: Duration,
  ) -> Self {
    let router = Router::new(history);
    let active = match router.route() {
      Route::Library { status } => *status,
      Route::Discover { .. } => ReadingStatus::ToRead,
    };
    let input = match router.route() {
      Route::Discover { query } => query.clone(),
      Route::Library { .. } => String::new(),
    };
    let (debouncer, debounced) = Debouncer::new(debounce);

    Self {
      search: SearchController::new(Arc::clone(&api)),
      library: LibraryView::new(active),
      flow: StatusFlow::with_toaster(Arc::clone(&api), Toaster::with_duration(toast_duration)),
      api,
      router,
      debouncer,
      debounced,
      input,
      notice: None,
    }
  }

  /// Shows the view for the initial location.
  ///
  /// On the discover view this searches the query from the location right away,
  /// without adding a history entry. Settled queries are mirrored into the
  /// location from here on, whichever view the app opened on.
  pub async fn mount(&mut self) -> Option<JoinHandle<()>> {
    let search = match self.router.route().clone() {
      Route::Discover { query } => self.search.search(&query, 1),
      Route::Library { status } => {
        self.load_library(status).await;
        None
      },
    };
    self.router.mount();
    search
  }

  /// Records typed search text; it is searched once typing pauses.
  pub fn type_query(&mut self, text: impl Into<String>) {
    self.input = text.into();
    self.debouncer.push(self.input.clone());
  }

  /// Waits for typed text to settle and acts on it.
  ///
  /// Returns the handle of the search it started, if any.
  pub async fn next_debounced(&mut self) -> Option<JoinHandle<()>> {
    let text = self.debounced.recv().await?;
    self.on_debounced_query(&text)
  }

  /// Acts on settled search text: mirrors it into the location and searches page 1.
  pub fn on_debounced_query(&mut self, text: &str) -> Option<JoinHandle<()>> {
    if !matches!(self.router.route(), Route::Discover { .. }) {
      return None;
    }
    self.router.sync_query(text);
    self.search.search(text, 1)
  }

  /// Switches views on user request, recording the change in the history.
  pub async fn navigate(&mut self, route: Route) -> Option<JoinHandle<()>> {
    self.router.navigate(route.clone());
    self.enter(route).await
  }

  /// Follows a history traversal made outside the app.
  pub async fn on_pop_state(&mut self) -> Option<JoinHandle<()>> {
    let route = self.router.on_pop().clone();
    self.enter(route).await
  }

  async fn enter(&mut self, route: Route) -> Option<JoinHandle<()>> {
    match route {
      Route::Discover { query } => {
        self.input = query.clone();
        self.search.search(&query, 1)
      },
      Route::Library { status } => {
        self.search.cancel();
        self.load_library(status).await;
        None
      },
    }
  }

  async fn load_library(&mut self, status: ReadingStatus) {
    // Failures end up in the view's error field
    let _ = self.library.load(self.api.as_ref(), status).await;
  }

  /// Shows another page of the current search.
  pub fn set_page(&mut self, page: u32) -> Option<JoinHandle<()>> { self.search.set_page(page) }

  /// Repeats the last search after an error.
  pub fn retry(&mut self) -> Option<JoinHandle<()>> { self.search.retry() }

  /// Changes the status of `book` as displayed, announcing it with a toast.
  ///
  /// The displayed lists only change once the backend accepted the change. On
  /// failure a notice is set and nothing else changes.
  pub async fn change_status(&mut self, book: &Book, new_status: ReadingStatus) -> Option<ToastData> {
    match self.flow.change_status(&book.work_key, new_status, book.status, &book.metadata()).await {
      Ok(toast) => {
        self.notice = None;
        self.search.patch_book_status(&book.work_key, Some(new_status));
        if self.in_library() {
          self.library.apply_status_change(&book.work_key, new_status);
        }
        Some(toast)
      },
      Err(e) => {
        self.notice = Some(status_notice(&e));
        None
      },
    }
  }

  /// Reverts the change announced by `toast`.
  ///
  /// Search results are patched in place; the library tab is fetched again since
  /// the book may have to reappear in it.
  pub async fn undo(&mut self, toast: &ToastData) {
    match self.flow.undo(toast).await {
      Ok(restored) => {
        self.notice = None;
        self.search.patch_book_status(&toast.work_key, restored);
        if self.in_library() {
          self.load_library(self.library.active).await;
        }
      },
      Err(e) => self.notice = Some(status_notice(&e)),
    }
  }

  fn in_library(&self) -> bool { matches!(self.router.route(), Route::Library { .. }) }

  /// The current route.
  pub fn route(&self) -> &Route { self.router.route() }

  /// The history the app navigates.
  pub fn history(&self) -> &H { self.router.history() }

  /// Mutable access to the history.
  pub fn history_mut(&mut self) -> &mut H { self.router.history_mut() }

  /// The text in the search box.
  pub fn input(&self) -> &str { &self.input }

  /// A snapshot of the search view.
  pub fn search_state(&self) -> SearchState { self.search.state() }

  /// A receiver following the search view.
  pub fn subscribe_search(&self) -> watch::Receiver<SearchState> { self.search.subscribe() }

  /// The library view.
  pub fn library(&self) -> &LibraryView { &self.library }

  /// The undo toast currently showing.
  pub fn toast(&self) -> Option<ToastData> { self.flow.toaster().current() }

  /// A receiver following the undo toast.
  pub fn subscribe_toast(&self) -> watch::Receiver<Option<ToastData>> {
    self.flow.toaster().subscribe()
  }

  /// Message about a failed status change, until the next successful one.
  pub fn notice(&self) -> Option<&str> { self.notice.as_deref() }

  /// Clears the notice.
  pub fn dismiss_notice(&mut self) { self.notice = None; }
}

impl App<MemoryHistory> {
  /// Steps back in the history and follows it.
  pub async fn back(&mut self) -> Option<JoinHandle<()>> {
    self.router.history_mut().back()?;
    self.on_pop_state().await
  }

  /// Steps forward in the history and follows it.
  pub async fn forward(&mut self) -> Option<JoinHandle<()>> {
    self.router.history_mut().forward()?;
    self.on_pop_state().await
  }
}

fn status_notice(e: &ShelfError) -> String {
  match e {
    ShelfError::ApiError { detail: Some(detail), .. } => detail.clone(),
    _ => STATUS_ERROR.to_string(),
  }
}
