//! Academic paper metadata for markdown note vaults.
//!
//! `papernote` turns a paper identifier into a markdown note carrying structured
//! front matter and a few prose sections. It provides:
//!
//! - Bibliographic retrieval from [OpenAlex](https://openalex.org)
//! - Code-implementation lookup (methods and datasets) from Papers with Code
//! - Abstract reconstruction from OpenAlex's inverted-index encoding
//! - Preference-driven merging of both sources into one record
//! - Front matter reconciliation that respects properties a user already set
//! - A directory-backed vault with per-note serialized header updates
//!
//! # Getting Started
//!
//! ```no_run
//! use papernote::{config::Config, Papernote};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!   let config = Config::load(Config::default_path())?;
//!   let papernote = Papernote::from_config(config);
//!
//!   let outcome = papernote.create_paper_note("https://openalex.org/W2741809807").await?;
//!   println!("Wrote {}", outcome.path.display());
//!   Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`decoder`]: Inverted-index abstract reconstruction
//! - [`paper`]: Canonical bibliographic record and its wire shape
//! - [`openalex`]: Bibliographic client and search suggestions
//! - [`paperswithcode`]: Implementation client
//! - [`merge`]: Combining both sources under [`config::MetadataPreferences`]
//! - [`frontmatter`]: Property projection and reconciliation
//! - [`body`]: Prose sections appended to the note body
//! - [`vault`]: Note storage
//! - [`debounce`]: Quiet-period coalescing for search-as-you-type
//! - [`workflow`]: The end-to-end "create or update paper note" flow

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::{
  collections::{BTreeMap, HashMap},
  path::{Path, PathBuf},
  sync::Arc,
  time::Duration,
};

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value as YamlValue};
use tracing::{debug, info, trace, warn};
#[cfg(test)]
use {tempfile::tempdir, tracing_test::traced_test};

pub mod body;
pub mod config;
pub mod debounce;
pub mod decoder;
pub mod error;
pub mod frontmatter;
pub mod merge;
pub mod openalex;
pub mod paper;
pub mod paperswithcode;
pub mod vault;
pub mod workflow;

pub use workflow::Papernote;

use crate::{
  config::{Config, MetadataPreferences},
  error::*,
  paper::{Author, CanonicalPaper, PaperIds},
  paperswithcode::{CatalogEntry, ImplementationRecord},
};

/// Sends a GET request and returns the body of a successful response.
///
/// Transport failures surface as [`PapernoteError::Network`], non-success
/// statuses as [`PapernoteError::Status`].
pub(crate) async fn fetch_bytes(
  http: &reqwest::Client,
  url: &str,
  query: &[(&str, &str)],
) -> Result<Vec<u8>> {
  let request = http.get(url).query(query).header("Accept", "application/json").build()?;
  let url = request.url().to_string();
  debug!("GET {}", url);

  let response = http.execute(request).await?;
  let status = response.status();
  if !status.is_success() {
    return Err(PapernoteError::Status { url, status: status.as_u16() });
  }

  let data = response.bytes().await?;
  trace!("{} response: {}", url, String::from_utf8_lossy(&data));
  Ok(data.to_vec())
}

/// Common traits and types for ergonomic imports.
///
/// ```no_run
/// use papernote::prelude::*;
///
/// async fn example(vault: &FsVault) -> Result<(), PapernoteError> {
///   let note = vault.get_file_by_path("papers/Attention.md".as_ref()).await?;
///   Ok(())
/// }
/// ```
pub mod prelude {
  pub use crate::{
    error::PapernoteError,
    vault::{FsVault, Vault},
  };
}
