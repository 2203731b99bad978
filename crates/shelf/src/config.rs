//! Configuration for the shelf library and server.
//!
//! Configuration lives in a TOML file. Every field has a default, so a missing file
//! or a partially filled one is fine:
//!
//! ```toml
//! database_path = "/home/me/.local/share/shelf/shelf.db"
//! catalog_url = "https://openlibrary.org/search.json"
//! request_timeout_secs = 30
//! cache_ttl_hours = 24
//! bind = "127.0.0.1:7000"
//! ```

use super::*;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Location of the SQLite database
  pub database_path:        PathBuf,
  /// OpenLibrary search endpoint
  pub catalog_url:          String,
  /// Base URL for cover images
  pub covers_url:           String,
  /// Timeout applied to every catalog request
  pub request_timeout_secs: u64,
  /// How long a cached search response stays fresh
  pub cache_ttl_hours:      i64,
  /// Page size used for catalog searches
  pub search_limit:         u32,
  /// Address the HTTP server listens on
  pub bind:                 String,
  /// Browser origin allowed to call the HTTP API
  pub allowed_origin:       String,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      database_path:        Database::default_path(),
      catalog_url:          catalog::OPENLIBRARY_SEARCH_URL.to_string(),
      covers_url:           catalog::OPENLIBRARY_COVER_URL.to_string(),
      request_timeout_secs: 30,
      cache_ttl_hours:      24,
      search_limit:         100,
      bind:                 "127.0.0.1:7000".to_string(),
      allowed_origin:       "http://localhost:7001".to_string(),
    }
  }
}

impl Config {
  /// Default location of the configuration file.
  ///
  /// - On Unix: `~/.config/shelf/config.toml`
  /// - On macOS: `~/Library/Application Support/shelf/config.toml`
  /// - On Windows: `%APPDATA%\shelf\config.toml`
  /// - Fallback: `./config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("shelf").join("config.toml")
  }

  /// Loads the configuration at `path`, falling back to defaults when the file does
  /// not exist.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if !path.exists() {
      debug!("No config at {}, using defaults", path.display());
      return Ok(Self::default());
    }
    let content = std::fs::read_to_string(path)?;
    let config: Self = toml::from_str(&content)?;
    trace!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
  }

  /// Writes the configuration to `path`, creating parent directories.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    Ok(())
  }

  /// The catalog request timeout.
  pub fn request_timeout(&self) -> Duration { Duration::from_secs(self.request_timeout_secs) }

  /// Sets the database location.
  pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.database_path = path.into();
    self
  }

  /// Points catalog searches at another endpoint.
  pub fn with_catalog_url(mut self, url: impl Into<String>) -> Self {
    self.catalog_url = url.into();
    self
  }

  /// Sets the cover image base URL.
  pub fn with_covers_url(mut self, url: impl Into<String>) -> Self {
    self.covers_url = url.into();
    self
  }

  /// Sets the catalog request timeout.
  pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
    self.request_timeout_secs = timeout.as_secs();
    self
  }

  /// Sets the server listen address.
  pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
    self.bind = bind.into();
    self
  }
}
