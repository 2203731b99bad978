//! Client-side routing between the discover and library views.
//!
//! Locations are the path-and-query part of a URL:
//!
//! | Location                  | Route                             |
//! |---------------------------|-----------------------------------|
//! | `/`, `/?q=dune`           | [`Route::Discover`]               |
//! | `/library/to-read`        | [`Route::Library`] (to read)      |
//! | `/library/did-not-finish` | [`Route::Library`] (not finished) |
//! | `/library/completed`      | [`Route::Library`] (completed)    |
//!
//! Anything else falls back to an empty discover view.

use url::{form_urlencoded, Url};

use super::*;

/// Base used to resolve bare locations.
const LOCATION_BASE: &str = "http://shelf.local/";

/// A view of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
  /// Catalog search, with the query from the `q` parameter
  Discover {
    /// Search text, empty for none
    query: String,
  },
  /// One tab of the library
  Library {
    /// Status the tab lists
    status: ReadingStatus,
  },
}

impl Default for Route {
  fn default() -> Self { Self::Discover { query: String::new() } }
}

impl Route {
  /// Derives the route for a location.
  ///
  /// ```
  /// use shelf::{book::ReadingStatus, client::Route};
  ///
  /// assert_eq!(Route::parse("/library/completed"), Route::Library {
  ///   status: ReadingStatus::Completed,
  /// });
  /// assert_eq!(Route::parse("/?q=the+hobbit"), Route::Discover { query: "the hobbit".into() });
  /// assert_eq!(Route::parse("/library/reading"), Route::default());
  /// ```
  pub fn parse(location: &str) -> Self {
    let url = match Url::parse(LOCATION_BASE).and_then(|base| base.join(location)) {
      Ok(url) => url,
      Err(e) => {
        debug!("Unparseable location {location:?}: {e}");
        return Self::default();
      },
    };

    let segments: Vec<&str> =
      url.path_segments().map(|segments| segments.filter(|s| !s.is_empty()).collect()).unwrap_or_default();
    if let ["library", slug] = segments.as_slice() {
      if let Ok(status) = ReadingStatus::from_slug(slug) {
        return Self::Library { status };
      }
    }

    let query = url
      .query_pairs()
      .find(|(key, _)| key == "q")
      .map(|(_, value)| value.into_owned())
      .unwrap_or_default();
    Self::Discover { query }
  }

  /// The location showing this route.
  pub fn to_location(&self) -> String {
    match self {
      Self::Discover { query } if query.is_empty() => "/".to_string(),
      Self::Discover { query } => {
        let encoded = form_urlencoded::Serializer::new(String::new()).append_pair("q", query).finish();
        format!("/?{encoded}")
      },
      Self::Library { status } => format!("/library/{}", status.slug()),
    }
  }
}

/// The browser history as the router sees it.
pub trait History {
  /// The current location.
  fn location(&self) -> String;

  /// Adds `location` as a new entry after the current one.
  fn push(&mut self, location: &str);
}

/// An in-memory history with back and forward navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryHistory {
  entries: Vec<String>,
  index:   usize,
}

impl MemoryHistory {
  /// A history holding only `location`.
  pub fn new(location: impl Into<String>) -> Self { Self { entries: vec![location.into()], index: 0 } }

  /// Steps back one entry, returning the new location.
  pub fn back(&mut self) -> Option<&str> {
    self.index = self.index.checked_sub(1)?;
    Some(&self.entries[self.index])
  }

  /// Steps forward one entry, returning the new location.
  pub fn forward(&mut self) -> Option<&str> {
    if self.index + 1 >= self.entries.len() {
      return None;
    }
    self.index += 1;
    Some(&self.entries[self.index])
  }

  /// Every entry, oldest first.
  pub fn entries(&self) -> &[String] { &self.entries }
}

impl History for MemoryHistory {
  fn location(&self) -> String { self.entries[self.index].clone() }

  fn push(&mut self, location: &str) {
    self.entries.truncate(self.index + 1);
    self.entries.push(location.to_string());
    self.index += 1;
  }
}

/// Keeps the [`Route`] and the history in step.
///
/// User-driven changes write to the history; history traversal only re-derives the
/// route. A push never repeats the current location.
pub struct Router<H> {
  history: H,
  route:   Route,
  mounted: bool,
}

impl<H: History> Router<H> {
  /// A router whose route is derived from the current location.
  pub fn new(history: H) -> Self {
    let route = Route::parse(&history.location());
    Self { history, route, mounted: false }
  }

  /// The current route.
  pub fn route(&self) -> &Route { &self.route }

  /// The underlying history.
  pub fn history(&self) -> &H { &self.history }

  /// Mutable access to the underlying history, e.g. to traverse it.
  pub fn history_mut(&mut self) -> &mut H { &mut self.history }

  /// Marks the initial view as shown; query syncs before this record nothing.
  pub fn mount(&mut self) { self.mounted = true; }

  /// Switches to `route` and records it in the history.
  pub fn navigate(&mut self, route: Route) {
    self.route = route;
    self.push_current();
  }

  /// Mirrors a settled search query into the location.
  ///
  /// Before [`mount`](Router::mount) and outside the discover view this does
  /// nothing. A query matching the current location records nothing either.
  /// Returns whether a history entry was added.
  pub fn sync_query(&mut self, query: &str) -> bool {
    if !self.mounted {
      trace!("Skipping query sync before mount");
      return false;
    }
    if !matches!(self.route, Route::Discover { .. }) {
      return false;
    }
    self.route = Route::Discover { query: query.trim().to_string() };
    self.push_current()
  }

  /// Re-derives the route after the history moved without the router's doing.
  pub fn on_pop(&mut self) -> &Route {
    self.route = Route::parse(&self.history.location());
    debug!("History moved to {:?}", self.route);
    &self.route
  }

  fn push_current(&mut self) -> bool {
    let location = self.route.to_location();
    if location == self.history.location() {
      return false;
    }
    trace!("Pushing {location}");
    self.history.push(&location);
    true
  }
}
