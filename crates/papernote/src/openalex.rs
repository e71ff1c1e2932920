//! Bibliographic client for the OpenAlex API.
//!
//! Two endpoints are used:
//!
//! - `GET {base}/works/{id}` for the full record of one work
//! - `GET {base}/autocomplete/works?q={query}` for search-as-you-type suggestions
//!
//! Both accept the optional `mailto` polite parameter, which moves requests into
//! OpenAlex's faster, more consistent pool. It is a courtesy and never needed for
//! correctness.
//!
//! # Examples
//!
//! ```no_run
//! use papernote::openalex::OpenAlexClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAlexClient::new().with_contact_email("me@example.org");
//!
//! let suggestions = client.autocomplete("attention is all you need").await?;
//! let paper = client.fetch_by_id(&suggestions[0].id).await?;
//! println!("{} has {} authors", paper.display_name, paper.authors.len());
//! # Ok(())
//! # }
//! ```

use super::*;
use crate::{fetch_bytes, paper::work_key};

/// Client for the OpenAlex works API.
#[derive(Debug, Clone)]
pub struct OpenAlexClient {
  /// HTTP client, reused across requests
  http:          reqwest::Client,
  /// API base, without a trailing slash
  base_url:      String,
  /// Polite-pool contact address
  contact_email: Option<String>,
}

/// One autocomplete result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
  /// Work URL, e.g. `https://openalex.org/W2741809807`
  pub id:             String,
  /// Title
  pub display_name:   String,
  /// Short disambiguation text, usually the author list
  #[serde(default)]
  pub hint:           Option<String>,
  /// Citation count
  #[serde(default)]
  pub cited_by_count: Option<u64>,
  /// DOI or other external identifier
  #[serde(default)]
  pub external_id:    Option<String>,
}

/// The `{ "results": [...] }` envelope around autocomplete responses.
#[derive(Debug, Deserialize)]
struct SuggestionPage {
  /// Suggestions in OpenAlex's ranking order
  #[serde(default)]
  results: Vec<Suggestion>,
}

impl Default for OpenAlexClient {
  fn default() -> Self { Self::new() }
}

impl OpenAlexClient {
  /// Creates a client for the public OpenAlex API.
  pub fn new() -> Self {
    Self {
      http:          reqwest::Client::new(),
      base_url:      config::OPENALEX_URL.to_string(),
      contact_email: None,
    }
  }

  /// Creates a client from the endpoint and contact settings of `config`.
  pub fn from_config(config: &Config) -> Self {
    let client = Self::new().with_base_url(&config.openalex_url);
    match config.contact_email() {
      Some(email) => client.with_contact_email(email),
      None => client,
    }
  }

  /// Uses a different API base, e.g. a mock server in tests.
  pub fn with_base_url(mut self, base_url: &str) -> Self {
    self.base_url = base_url.trim_end_matches('/').to_string();
    self
  }

  /// Sends `mailto={email}` with every request.
  pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
    self.contact_email = Some(email.into());
    self
  }

  /// Fetches one work and normalizes it into a [`CanonicalPaper`].
  ///
  /// `id` may be a bare key (`W2741809807`) or a full work URL; only its last
  /// path segment is sent.
  ///
  /// # Errors
  ///
  /// - [`PapernoteError::InvalidIdentifier`] for an empty id
  /// - [`PapernoteError::Network`] / [`PapernoteError::Status`] when the request fails
  /// - [`PapernoteError::MalformedResponse`] when the body is not a work object
  pub async fn fetch_by_id(&self, id: &str) -> Result<CanonicalPaper> {
    let key = work_key(id).ok_or(PapernoteError::InvalidIdentifier)?;
    let url = format!("{}/works/{}", self.base_url, key);

    let data = fetch_bytes(&self.http, &url, &self.polite_query()).await?;
    let paper = CanonicalPaper::from_response(&data)?;
    debug!("Fetched OpenAlex work {} \"{}\"", key, paper.display_name);
    Ok(paper)
  }

  /// Returns autocomplete suggestions for a free-text query.
  ///
  /// An empty or whitespace-only query returns no suggestions without
  /// contacting the service.
  pub async fn autocomplete(&self, query: &str) -> Result<Vec<Suggestion>> {
    let query = query.trim();
    if query.is_empty() {
      return Ok(Vec::new());
    }

    let url = format!("{}/autocomplete/works", self.base_url);
    let mut params = vec![("q", query)];
    params.extend(self.polite_query());

    let data = fetch_bytes(&self.http, &url, &params).await?;
    let page: SuggestionPage = serde_json::from_slice(&data)
      .map_err(|e| PapernoteError::MalformedResponse(format!("OpenAlex autocomplete: {}", e)))?;
    Ok(page.results)
  }

  /// The `mailto` parameter, when a contact address is set.
  fn polite_query(&self) -> Vec<(&str, &str)> {
    self.contact_email.as_deref().map(|email| ("mailto", email)).into_iter().collect()
  }
}
