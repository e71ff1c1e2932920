//! Persisted settings consumed by the workflow.
//!
//! Settings live in a TOML file, by default under the platform configuration
//! directory (`~/.config/papernote/config.toml` on Linux). Every key is
//! optional; missing keys take the values from [`Config::default`].
//!
//! ```toml
//! vault_path = "/home/me/Documents/vault"
//! paper_folder = "papers"
//! contact_email = "me@example.org"
//! overwrite = false
//!
//! [metadata]
//! ids = true
//! keywords = true
//! abstract = true
//! authors = true
//! methods = false
//! datasets = true
//! ```

use super::*;

/// Default OpenAlex API base.
pub const OPENALEX_URL: &str = "https://api.openalex.org";
/// Default Papers with Code API base.
pub const PAPERSWITHCODE_URL: &str = "https://paperswithcode.com/api/v1";
/// Default Papers with Code site, used for links in note bodies.
pub const PAPERSWITHCODE_SITE: &str = "https://paperswithcode.com";

/// Settings for one vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Root directory of the notes vault
  pub vault_path:          PathBuf,
  /// Folder inside the vault that paper notes are written to
  pub paper_folder:        PathBuf,
  /// Contact address sent to OpenAlex as the `mailto` polite parameter
  pub contact_email:       Option<String>,
  /// Replace front matter properties that already exist on a note
  pub overwrite:           bool,
  /// OpenAlex API base URL
  pub openalex_url:        String,
  /// Papers with Code API base URL
  pub paperswithcode_url:  String,
  /// Papers with Code site URL for dataset and method links
  pub paperswithcode_site: String,
  /// Which metadata ends up in notes
  pub metadata:            MetadataPreferences,
}

/// Per-field toggles deciding what metadata a note receives.
///
/// Disabled fields are never fetched where that can be avoided, and never
/// written to the note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataPreferences {
  /// Catalog identifiers (OpenAlex, DOI, MAG, Papers with Code)
  pub ids:           bool,
  /// Keyword list
  pub keywords:      bool,
  /// Abstract section in the body
  #[serde(rename = "abstract")]
  pub abstract_text: bool,
  /// Author ids and names
  pub authors:       bool,
  /// Methods line in the body
  pub methods:       bool,
  /// Datasets line in the body
  pub datasets:      bool,
}

impl Default for MetadataPreferences {
  fn default() -> Self {
    Self {
      ids:           true,
      keywords:      true,
      abstract_text: true,
      authors:       true,
      methods:       true,
      datasets:      true,
    }
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      vault_path:          Self::default_vault_path(),
      paper_folder:        PathBuf::from("papers"),
      contact_email:       None,
      overwrite:           false,
      openalex_url:        OPENALEX_URL.to_string(),
      paperswithcode_url:  PAPERSWITHCODE_URL.to_string(),
      paperswithcode_site: PAPERSWITHCODE_SITE.to_string(),
      metadata:            MetadataPreferences::default(),
    }
  }
}

impl Config {
  /// Returns the default configuration file location.
  ///
  /// - On Linux: `~/.config/papernote/config.toml`
  /// - On macOS: `~/Library/Application Support/papernote/config.toml`
  /// - On Windows: `%APPDATA%\papernote\config.toml`
  /// - Fallback: `./papernote/config.toml`
  pub fn default_path() -> PathBuf {
    dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("papernote").join("config.toml")
  }

  /// Returns the default vault root, `<documents>/vault`.
  pub fn default_vault_path() -> PathBuf {
    dirs::document_dir().unwrap_or_else(|| PathBuf::from(".")).join("vault")
  }

  /// Reads a configuration file.
  ///
  /// # Errors
  ///
  /// Fails if the file cannot be read or is not valid TOML for this shape.
  pub fn load(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    debug!("Loading configuration from {}", path.display());
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
  }

  /// Writes this configuration, creating parent directories as needed.
  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, toml::to_string_pretty(self)?)?;
    debug!("Saved configuration to {}", path.display());
    Ok(())
  }

  /// Sets the vault root.
  pub fn with_vault_path(mut self, vault_path: impl AsRef<Path>) -> Self {
    self.vault_path = vault_path.as_ref().to_path_buf();
    self
  }

  /// Sets the folder, relative to the vault, that paper notes go in.
  pub fn with_paper_folder(mut self, paper_folder: impl AsRef<Path>) -> Self {
    self.paper_folder = paper_folder.as_ref().to_path_buf();
    self
  }

  /// Sets the polite contact address.
  pub fn with_contact_email(mut self, email: impl Into<String>) -> Self {
    self.contact_email = Some(email.into());
    self
  }

  /// Sets whether existing front matter properties are replaced.
  pub fn with_overwrite(mut self, overwrite: bool) -> Self {
    self.overwrite = overwrite;
    self
  }

  /// Sets the metadata preferences.
  pub fn with_metadata(mut self, metadata: MetadataPreferences) -> Self {
    self.metadata = metadata;
    self
  }

  /// Points both API clients at other base URLs.
  pub fn with_endpoints(mut self, openalex_url: &str, paperswithcode_url: &str) -> Self {
    self.openalex_url = openalex_url.to_string();
    self.paperswithcode_url = paperswithcode_url.to_string();
    self
  }

  /// The contact address, with blank values treated as unset.
  pub fn contact_email(&self) -> Option<&str> {
    self.contact_email.as_deref().map(str::trim).filter(|email| !email.is_empty())
  }
}
