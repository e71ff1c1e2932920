//! Implementation client for the Papers with Code API.
//!
//! A paper is matched by title: the first result of a title search is taken as
//! the paper's implementation record, without any local re-ranking. Its methods
//! and datasets come from two further endpoints:
//!
//! - `GET {base}/papers?title={title}`
//! - `GET {base}/papers/{id}/methods`
//! - `GET {base}/papers/{id}/datasets`
//!
//! All three calls are best-effort from the workflow's point of view. The plain
//! `find_by_title`/`fetch_*` methods still report failures; [`PapersWithCodeClient::lookup`]
//! is the degrading entry point the workflow uses.

use super::*;
use crate::fetch_bytes;

/// Client for the Papers with Code API.
#[derive(Debug, Clone)]
pub struct PapersWithCodeClient {
  /// HTTP client, reused across requests
  http:     reqwest::Client,
  /// API base, without a trailing slash
  base_url: String,
}

/// A paper's entry in the Papers with Code catalog, with whatever linked
/// methods and datasets were requested.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImplementationRecord {
  /// Papers with Code paper id (a slug)
  pub id:                 String,
  /// Title as Papers with Code has it
  #[serde(default)]
  pub title:              String,
  /// General PDF link
  #[serde(default)]
  pub url_pdf:            Option<String>,
  /// Conference proceedings PDF link
  #[serde(default)]
  pub conference_url_pdf: Option<String>,
  /// Linked methods; `None` when not requested
  #[serde(skip_deserializing)]
  pub methods:            Option<Vec<CatalogEntry>>,
  /// Linked datasets; `None` when not requested
  #[serde(skip_deserializing)]
  pub datasets:           Option<Vec<CatalogEntry>>,
}

/// A method or dataset linked to a paper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
  /// Catalog id (a slug)
  pub id:        String,
  /// Short name
  #[serde(default)]
  pub name:      String,
  /// Long name
  #[serde(default)]
  pub full_name: Option<String>,
}

/// The `{ "results": [...] }` envelope around every list response.
#[derive(Debug, Deserialize)]
struct Page<T> {
  /// Items in service order
  #[serde(default = "Vec::new")]
  results: Vec<T>,
}

impl CatalogEntry {
  /// Display label: the full name when present and non-empty, else the short name.
  pub fn label(&self) -> &str {
    self.full_name.as_deref().filter(|name| !name.is_empty()).unwrap_or(&self.name)
  }
}

impl ImplementationRecord {
  /// Preferred PDF link: the conference copy, then the general one.
  pub fn pdf_url(&self) -> Option<&str> {
    non_empty(&self.conference_url_pdf).or_else(|| non_empty(&self.url_pdf))
  }
}

/// The link, unless it is missing or blank.
fn non_empty(url: &Option<String>) -> Option<&str> { url.as_deref().filter(|url| !url.is_empty()) }

impl Default for PapersWithCodeClient {
  fn default() -> Self { Self::new() }
}

impl PapersWithCodeClient {
  /// Creates a client for the public Papers with Code API.
  pub fn new() -> Self {
    Self { http: reqwest::Client::new(), base_url: config::PAPERSWITHCODE_URL.to_string() }
  }

  /// Creates a client from the endpoint setting of `config`.
  pub fn from_config(config: &Config) -> Self { Self::new().with_base_url(&config.paperswithcode_url) }

  /// Uses a different API base, e.g. a mock server in tests.
  pub fn with_base_url(mut self, base_url: &str) -> Self {
    self.base_url = base_url.trim_end_matches('/').to_string();
    self
  }

  /// Finds the implementation record for a title: the first search result, or
  /// `None` when the search comes back empty.
  pub async fn find_by_title(&self, title: &str) -> Result<Option<ImplementationRecord>> {
    let url = format!("{}/papers", self.base_url);
    let page: Page<ImplementationRecord> = self.get_page(&url, &[("title", title)]).await?;
    Ok(page.results.into_iter().next())
  }

  /// Methods linked to a Papers with Code paper.
  pub async fn fetch_methods(&self, record_id: &str) -> Result<Vec<CatalogEntry>> {
    let url = format!("{}/papers/{}/methods", self.base_url, record_id);
    Ok(self.get_page(&url, &[]).await?.results)
  }

  /// Datasets linked to a Papers with Code paper.
  pub async fn fetch_datasets(&self, record_id: &str) -> Result<Vec<CatalogEntry>> {
    let url = format!("{}/papers/{}/datasets", self.base_url, record_id);
    Ok(self.get_page(&url, &[]).await?.results)
  }

  /// Best-effort lookup of everything `preferences` asks for.
  ///
  /// Never fails. A failed search means no record. A failed methods or datasets
  /// fetch leaves that list empty while keeping the rest of the record. Lists
  /// whose preference is off are not requested and stay `None`.
  pub async fn lookup(
    &self,
    title: &str,
    preferences: &MetadataPreferences,
  ) -> Option<ImplementationRecord> {
    let mut record = match self.find_by_title(title).await {
      Ok(Some(record)) => record,
      Ok(None) => {
        debug!("No Papers with Code entry for \"{}\"", title);
        return None;
      },
      Err(e) => {
        warn!("Papers with Code search for \"{}\" failed: {}", title, e);
        return None;
      },
    };

    if preferences.methods {
      record.methods = Some(self.fetch_methods(&record.id).await.unwrap_or_else(|e| {
        warn!("Fetching methods for {} failed: {}", record.id, e);
        Vec::new()
      }));
    }

    if preferences.datasets {
      record.datasets = Some(self.fetch_datasets(&record.id).await.unwrap_or_else(|e| {
        warn!("Fetching datasets for {} failed: {}", record.id, e);
        Vec::new()
      }));
    }

    Some(record)
  }

  /// Fetches and parses one `{ "results": [...] }` page.
  async fn get_page<T>(&self, url: &str, query: &[(&str, &str)]) -> Result<Page<T>>
  where T: serde::de::DeserializeOwned {
    let data = fetch_bytes(&self.http, url, query).await?;
    serde_json::from_slice(&data)
      .map_err(|e| PapernoteError::MalformedResponse(format!("Papers with Code {}: {}", url, e)))
  }
}
