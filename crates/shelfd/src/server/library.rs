//! Library tabs and counts.

use super::*;

/// `GET /api/library/counts`
pub async fn counts(State(state): State<AppState>) -> ApiResult<Json<StatusCounts>> {
  Ok(Json(state.shelf.status_counts().await?))
}

/// `GET /api/library/:slug`
pub async fn tab(State(state): State<AppState>, UrlPath(slug): UrlPath<String>) -> ApiResult<Json<LibraryPage>> {
  let status = ReadingStatus::from_slug(&slug)?;
  Ok(Json(state.shelf.library(status).await?))
}
