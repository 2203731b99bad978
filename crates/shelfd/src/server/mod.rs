//! The JSON API served by `shelf serve`.
//!
//! | Route                          | Methods            |
//! |--------------------------------|--------------------|
//! | `/api/books/search`            | `GET`              |
//! | `/api/status`                  | `GET`              |
//! | `/api/status/*work_key`        | `GET` `PUT` `DELETE` |
//! | `/api/library/counts`          | `GET`              |
//! | `/api/library/:slug`           | `GET`              |
//!
//! Work keys travel unescaped in the path, so `/api/status/works/OL27448W` addresses
//! the work `/works/OL27448W`. Every failure is answered with `{"detail": "..."}`.

use axum::{
  extract::{Path as UrlPath, Query, State},
  http::{header, HeaderValue, Method, StatusCode},
  response::{IntoResponse, Response},
  routing::get,
  Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::*;

mod books;
mod library;
mod status;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
  /// The backend
  pub shelf:        Shelf,
  /// Page size used when a search does not ask for one
  pub search_limit: u32,
}

/// Builds the API router for `shelf`, with CORS for the configured origin.
pub fn router(shelf: Shelf) -> Result<Router> {
  let origin = HeaderValue::from_str(&shelf.config.allowed_origin)
    .map_err(|_| ShelfdError::InvalidOrigin(shelf.config.allowed_origin.clone()))?;
  let cors = CorsLayer::new()
    .allow_origin(origin)
    .allow_methods([Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS])
    .allow_headers([header::CONTENT_TYPE]);

  let state = AppState { search_limit: shelf.config.search_limit, shelf };
  Ok(
    Router::new()
      .route("/api/books/search", get(books::search))
      .route("/api/status", get(status::list))
      .route("/api/status/*work_key", get(status::get).put(status::put).delete(status::delete))
      .route("/api/library/counts", get(library::counts))
      .route("/api/library/:slug", get(library::tab))
      .layer(cors)
      .layer(TraceLayer::new_for_http())
      .with_state(state),
  )
}

/// A failed request, rendered as `{"detail": message}`.
#[derive(Debug)]
pub struct HttpError {
  /// Response status
  status: StatusCode,
  /// Message for the `detail` field
  detail: String,
}

impl HttpError {
  /// Rejects the request with `422 Unprocessable Entity`.
  pub fn unprocessable(detail: impl ToString) -> Self {
    Self { status: StatusCode::UNPROCESSABLE_ENTITY, detail: detail.to_string() }
  }
}

impl From<ShelfError> for HttpError {
  fn from(e: ShelfError) -> Self {
    let status = match &e {
      ShelfError::InvalidRequest(_) | ShelfError::InvalidStatus(_) => StatusCode::UNPROCESSABLE_ENTITY,
      ShelfError::InvalidSlug(_) | ShelfError::InvalidWorkKey(_) => StatusCode::BAD_REQUEST,
      ShelfError::NotFound => StatusCode::NOT_FOUND,
      ShelfError::CatalogTimeout => StatusCode::GATEWAY_TIMEOUT,
      ShelfError::CatalogStatus(_) | ShelfError::CatalogUnavailable(_) | ShelfError::Network(_) =>
        StatusCode::BAD_GATEWAY,
      _ => {
        error!("Request failed: {e}");
        return Self {
          status: StatusCode::INTERNAL_SERVER_ERROR,
          detail: "Internal server error".to_string(),
        };
      },
    };
    Self { status, detail: e.to_string() }
  }
}

impl IntoResponse for HttpError {
  fn into_response(self) -> Response {
    debug!("Answering {}: {}", self.status, self.detail);
    (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
  }
}

/// Result of a handler.
type ApiResult<T> = core::result::Result<T, HttpError>;
