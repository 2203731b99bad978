//! Catalog search.

use axum::extract::rejection::QueryRejection;

use super::*;

/// Query string of `GET /api/books/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
  /// Search text
  q:     String,
  /// Requested page
  #[serde(default = "first_page")]
  page:  u32,
  /// Page size
  limit: Option<u32>,
}

/// Default page of a search.
fn first_page() -> u32 { 1 }

/// `GET /api/books/search?q=..&page=..&limit=..`
pub async fn search(
  State(state): State<AppState>,
  params: core::result::Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<SearchResult>> {
  let Query(params) = params.map_err(|e| HttpError::unprocessable(e.body_text()))?;
  let limit = params.limit.unwrap_or(state.search_limit);
  Ok(Json(state.shelf.search(&params.q, params.page, limit).await?))
}
