//! Error types for the papernote library.
//!
//! Failures fall into three families that callers treat differently:
//! - fetch failures (transport problems and non-success HTTP statuses)
//! - malformed responses (a body that does not have the expected shape)
//! - file operations (the vault could not be read or written)
//!
//! The workflow aborts on any bibliographic failure, but swallows fetch and
//! malformed-response failures from the implementation lookup.
//!
//! # Examples
//!
//! ```no_run
//! use papernote::{error::PapernoteError, openalex::OpenAlexClient};
//!
//! # async fn example() -> Result<(), PapernoteError> {
//! let client = OpenAlexClient::new();
//! match client.fetch_by_id("W2741809807").await {
//!   Err(e) if e.is_fetch_error() => println!("OpenAlex unreachable: {}", e),
//!   Err(PapernoteError::MalformedResponse(msg)) => println!("Unexpected body: {}", msg),
//!   Err(e) => println!("Other error: {}", e),
//!   Ok(paper) => println!("Fetched {}", paper.display_name),
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

use super::*;

/// Error type alias used for the [`papernote`](crate) crate.
pub type Result<T> = core::result::Result<T, PapernoteError>;

/// Errors that can occur while fetching, merging and writing paper notes.
#[derive(Error, Debug)]
pub enum PapernoteError {
  /// The work identifier was empty or had no usable final path segment.
  #[error("Invalid identifier format")]
  InvalidIdentifier,

  /// A network request did not complete.
  ///
  /// This covers DNS failures, refused connections, TLS errors and bodies that
  /// could not be read off the wire.
  #[error(transparent)]
  Network(#[from] reqwest::Error),

  /// A request completed with a non-success HTTP status.
  #[error("Request to {url} failed with status {status}")]
  Status {
    /// The URL that was requested
    url:    String,
    /// The HTTP status code returned
    status: u16,
  },

  /// A response body could not be parsed as the expected shape.
  ///
  /// Missing optional fields never produce this; only bodies that are not
  /// JSON, or whose present fields have the wrong type, do.
  #[error("Malformed response: {0}")]
  MalformedResponse(String),

  /// The bibliographic record had no display name, so no note filename can be
  /// derived from it.
  #[error("Paper \"{0}\" has no display name")]
  MissingTitle(String),

  /// A vault read or write failed.
  #[error("File operation on {path} failed: {source}")]
  FileOperation {
    /// Vault path the operation targeted
    path:   PathBuf,
    /// Underlying I/O failure
    #[source]
    source: std::io::Error,
  },

  /// A note's existing front matter is not a key/value mapping.
  #[error("Front matter of {0} is not a mapping")]
  FrontMatter(PathBuf),

  /// Front matter YAML could not be parsed or rendered.
  #[error(transparent)]
  Yaml(#[from] serde_yaml::Error),

  /// A file system operation outside the vault failed (configuration files).
  #[error(transparent)]
  Path(#[from] std::io::Error),

  /// The configuration file could not be parsed.
  #[error(transparent)]
  TomlDe(#[from] toml::de::Error),

  /// The configuration could not be serialized.
  #[error(transparent)]
  TomlSer(#[from] toml::ser::Error),

  /// Invalid or missing configuration.
  #[error("{0}")]
  Config(String),
}

impl PapernoteError {
  /// Whether this error is a fetch failure (transport or HTTP status).
  pub fn is_fetch_error(&self) -> bool {
    matches!(self, PapernoteError::Network(_) | PapernoteError::Status { .. })
  }

  /// Whether this error is a vault write that found the note already there.
  pub fn is_already_exists(&self) -> bool {
    matches!(
      self,
      PapernoteError::FileOperation { source, .. } if source.kind() == std::io::ErrorKind::AlreadyExists
    )
  }

  /// Builds a [`PapernoteError::FileOperation`] for `path`.
  pub(crate) fn file_operation(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
    let path = path.into();
    move |source| PapernoteError::FileOperation { path, source }
  }
}
