//! Reading status resources.

use axum::extract::rejection::JsonRejection;

use super::*;

/// The path wildcard drops the leading slash of the work key.
fn work_key(raw: &str) -> String { format!("/{}", raw.trim_start_matches('/')) }

/// `GET /api/status`
pub async fn list(State(state): State<AppState>) -> ApiResult<Json<StatusList>> {
  Ok(Json(StatusList { statuses: state.shelf.list_statuses().await? }))
}

/// `GET /api/status/*work_key`
pub async fn get(State(state): State<AppState>, UrlPath(raw): UrlPath<String>) -> ApiResult<Json<StatusRecord>> {
  let record = state.shelf.get_status(&work_key(&raw)).await?.ok_or(ShelfError::NotFound)?;
  Ok(Json(record))
}

/// `PUT /api/status/*work_key`
pub async fn put(
  State(state): State<AppState>,
  UrlPath(raw): UrlPath<String>,
  body: core::result::Result<Json<StatusUpdate>, JsonRejection>,
) -> ApiResult<Json<StatusRecord>> {
  let Json(update) = body.map_err(|e| HttpError::unprocessable(e.body_text()))?;
  let key = work_key(&raw);
  let record = state.shelf.set_status(&key, update.status, &update.metadata).await?;
  info!("Set {key} to {}", record.status);
  Ok(Json(record))
}

/// `DELETE /api/status/*work_key`
pub async fn delete(State(state): State<AppState>, UrlPath(raw): UrlPath<String>) -> ApiResult<StatusCode> {
  let key = work_key(&raw);
  if !state.shelf.delete_status(&key).await? {
    return Err(ShelfError::NotFound.into());
  }
  info!("Removed status of {key}");
  Ok(StatusCode::NO_CONTENT)
}
