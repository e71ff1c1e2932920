//! The end-to-end "create or update paper note" flow.
//!
//! ```text
//! Idle → FetchingBibliographic → FetchingImplementation → Merging
//!      → ResolvingTargetFile → ReconcilingFrontMatter → ComposingBody → Done
//! ```
//!
//! A failed bibliographic fetch ends the flow in `Failed` before anything in
//! the vault is touched. The implementation lookup cannot fail the flow: any
//! problem there just means the paper is merged without implementation data.
//! Vault failures after the note exists are reported, but earlier writes are
//! not rolled back.

use super::*;
use crate::{
  body,
  frontmatter::{reconcile, FrontMatterProjection},
  merge::{merge, AggregatePaper},
  openalex::OpenAlexClient,
  paperswithcode::PapersWithCodeClient,
  vault::{FsVault, NoteFile, Vault},
};

lazy_static! {
  /// Characters replaced by `_` when deriving a note filename from a title.
  static ref UNSAFE_FILENAME_CHARS: Regex = Regex::new(r"[^a-zA-Z0-9]").unwrap();
}

/// Where the flow is. Used for logging transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
  /// Nothing started yet
  Idle,
  /// Fetching the work from OpenAlex
  FetchingBibliographic,
  /// Looking the title up on Papers with Code
  FetchingImplementation,
  /// Combining both records
  Merging,
  /// Finding or creating the note
  ResolvingTargetFile,
  /// Writing properties
  ReconcilingFrontMatter,
  /// Appending prose sections
  ComposingBody,
  /// Finished
  Done,
  /// Aborted before the vault was touched
  Failed,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteOutcome {
  /// Vault-relative path of the note
  pub path:       PathBuf,
  /// Whether the note was created by this run
  pub created:    bool,
  /// Number of front matter properties written
  pub properties: usize,
  /// The merged record the note was built from
  pub paper:      AggregatePaper,
}

/// Fetches papers and writes them into a vault.
pub struct Papernote {
  /// Settings
  config:         Config,
  /// Bibliographic client
  openalex:       OpenAlexClient,
  /// Implementation client
  paperswithcode: PapersWithCodeClient,
  /// Note store
  vault:          Arc<dyn Vault>,
}

impl Papernote {
  /// Builds clients and a directory vault from `config`.
  pub fn from_config(config: Config) -> Self {
    let vault = Arc::new(FsVault::new(&config.vault_path));
    Self::with_vault(config, vault)
  }

  /// Builds clients from `config` but writes to the given vault.
  pub fn with_vault(config: Config, vault: Arc<dyn Vault>) -> Self {
    Self {
      openalex: OpenAlexClient::from_config(&config),
      paperswithcode: PapersWithCodeClient::from_config(&config),
      config,
      vault,
    }
  }

  /// Settings in use.
  pub fn config(&self) -> &Config { &self.config }

  /// The bibliographic client, e.g. for search suggestions.
  pub fn openalex(&self) -> &OpenAlexClient { &self.openalex }

  /// Creates the note for work `id`, or updates it if it already exists.
  ///
  /// # Errors
  ///
  /// - Any bibliographic fetch failure, with the vault untouched
  /// - [`PapernoteError::MissingTitle`] when the work has no title to name the note after
  /// - Vault failures while creating or writing the note
  pub async fn create_paper_note(&self, id: &str) -> Result<NoteOutcome> {
    let preferences = &self.config.metadata;
    let mut state = FlowState::Idle;

    transition(&mut state, FlowState::FetchingBibliographic);
    let paper = match self.openalex.fetch_by_id(id).await {
      Ok(paper) => paper,
      Err(e) => {
        transition(&mut state, FlowState::Failed);
        return Err(e);
      },
    };
    if paper.display_name.trim().is_empty() {
      transition(&mut state, FlowState::Failed);
      return Err(PapernoteError::MissingTitle(paper.id));
    }

    transition(&mut state, FlowState::FetchingImplementation);
    let implementation = self.paperswithcode.lookup(&paper.display_name, preferences).await;

    transition(&mut state, FlowState::Merging);
    let aggregate = merge(paper, implementation, preferences);

    transition(&mut state, FlowState::ResolvingTargetFile);
    let path = self.note_path(&aggregate.display_name);
    let (file, created) = self.resolve_note(&path).await?;

    transition(&mut state, FlowState::ReconcilingFrontMatter);
    let properties = self.write_front_matter(&file, &aggregate).await?;

    transition(&mut state, FlowState::ComposingBody);
    let text = body::compose(&aggregate, &self.config.paperswithcode_site);
    if !text.is_empty() {
      self.vault.append(&file, &text).await?;
    }

    transition(&mut state, FlowState::Done);
    info!(
      "{} note {} ({} properties written)",
      if created { "Created" } else { "Updated" },
      path.display(),
      properties
    );
    Ok(NoteOutcome { path, created, properties, paper: aggregate })
  }

  /// Vault-relative path of the note for a paper titled `display_name`.
  pub fn note_path(&self, display_name: &str) -> PathBuf {
    self.config.paper_folder.join(note_file_name(display_name))
  }

  /// Finds the note at `path` or creates it. A concurrent run that creates the
  /// note first turns this run into an update.
  async fn resolve_note(&self, path: &Path) -> Result<(NoteFile, bool)> {
    if let Some(file) = self.vault.get_file_by_path(path).await? {
      return Ok((file, false));
    }
    match self.vault.create(path, "").await {
      Ok(file) => Ok((file, true)),
      Err(e) if e.is_already_exists() => {
        debug!("{} was created concurrently, updating it instead", path.display());
        match self.vault.get_file_by_path(path).await? {
          Some(file) => Ok((file, false)),
          None => Err(e),
        }
      },
      Err(e) => Err(e),
    }
  }

  /// Projects `paper` and reconciles it into the note's header.
  async fn write_front_matter(&self, file: &NoteFile, paper: &AggregatePaper) -> Result<usize> {
    let projection = FrontMatterProjection::from(paper);
    let overwrite = self.config.overwrite;
    let mut written = 0;
    self
      .vault
      .process_front_matter(file, &mut |front_matter| {
        written = reconcile(front_matter, &projection, overwrite);
      })
      .await?;
    Ok(written)
  }
}

/// Filename for a paper note: every character outside `[a-zA-Z0-9]` becomes
/// `_`, and `.md` is appended.
pub fn note_file_name(display_name: &str) -> String {
  format!("{}.md", UNSAFE_FILENAME_CHARS.replace_all(display_name, "_"))
}

/// Moves the flow to `next`, logging the transition.
fn transition(state: &mut FlowState, next: FlowState) {
  debug!("Paper note flow: {:?} -> {:?}", state, next);
  *state = next;
}
