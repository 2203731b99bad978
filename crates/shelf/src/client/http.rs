//! [`ShelfApi`] over HTTP, talking to a running shelf server.

use reqwest::{Response, Url};

use super::*;

/// Error body returned by the shelf server.
#[derive(Debug, Deserialize)]
struct ErrorBody {
  /// Human-readable message
  detail: Option<String>,
}

/// HTTP client for the shelf server API.
///
/// Work keys contain slashes (`/works/OL27448W`) and are placed into request paths
/// unescaped; the server accepts an identifier spanning several path segments.
#[derive(Debug, Clone)]
pub struct HttpApi {
  /// Shared HTTP client
  client:   reqwest::Client,
  /// Server root, e.g. `http://localhost:7000`
  base_url: String,
}

impl HttpApi {
  /// Creates a client for the server at `base_url`.
  pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
    let base_url = Url::parse(base_url.as_ref())?.as_str().trim_end_matches('/').to_string();
    Ok(Self { client: reqwest::Client::new(), base_url })
  }

  /// URL of an API path below `/api`.
  fn url(&self, path: &str) -> String { format!("{}/api/{}", self.base_url, path) }

  /// URL of a single status resource.
  ///
  /// The leading `/` of the key is implied by the route, the server restores it.
  fn status_url(&self, work_key: &str) -> Result<String> {
    let work_key = crate::validate_work_key(work_key)?;
    Ok(self.url(&format!("status/{}", &work_key[1..])))
  }

  /// Decodes a successful response, or turns a failed one into [`ShelfError::ApiError`].
  async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let response = Self::check(response).await?;
    Ok(response.json::<T>().await?)
  }

  /// Passes successful responses through and converts failures.
  async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }
    let detail = response.json::<ErrorBody>().await.ok().and_then(|body| body.detail);
    trace!("Server answered {status}: {detail:?}");
    Err(ShelfError::ApiError { status: status.as_u16(), detail })
  }
}

#[async_trait]
impl ShelfApi for HttpApi {
  async fn search(&self, query: &str, page: u32, limit: u32) -> Result<SearchResult> {
    let response = self
      .client
      .get(self.url("books/search"))
      .query(&[("q", query.to_string()), ("page", page.to_string()), ("limit", limit.to_string())])
      .send()
      .await?;
    Self::decode(response).await
  }

  async fn get_status(&self, work_key: &str) -> Result<Option<StatusRecord>> {
    let response = self.client.get(self.status_url(work_key)?).send().await?;
    match Self::decode(response).await {
      Ok(record) => Ok(Some(record)),
      Err(e) if e.is_not_found() => Ok(None),
      Err(e) => Err(e),
    }
  }

  async fn put_status(&self, work_key: &str, update: &StatusUpdate) -> Result<StatusRecord> {
    let response = self.client.put(self.status_url(work_key)?).json(update).send().await?;
    Self::decode(response).await
  }

  async fn delete_status(&self, work_key: &str) -> Result<()> {
    let response = self.client.delete(self.status_url(work_key)?).send().await?;
    match Self::check(response).await {
      Ok(_) => Ok(()),
      Err(e) if e.is_not_found() => {
        debug!("Status for {work_key} was already gone");
        Ok(())
      },
      Err(e) => Err(e),
    }
  }

  async fn list_statuses(&self) -> Result<Vec<StatusRecord>> {
    let response = self.client.get(self.url("status")).send().await?;
    Self::decode::<StatusList>(response).await.map(|list| list.statuses)
  }

  async fn library(&self, status: ReadingStatus) -> Result<LibraryPage> {
    let response = self.client.get(self.url(&format!("library/{}", status.slug()))).send().await?;
    Self::decode(response).await
  }

  async fn counts(&self) -> Result<StatusCounts> {
    let response = self.client.get(self.url("library/counts")).send().await?;
    Self::decode(response).await
  }
}
