//! Note storage.
//!
//! The [`Vault`] trait is the narrow surface the workflow needs from a notes
//! store: look a note up, create one, append to one, and update its front
//! matter as a single read-modify-write. [`FsVault`] implements it over a plain
//! directory of markdown files.
//!
//! Front matter updates and appends to the same note are serialized through a
//! per-path lock ([`PathLocks`]), and front matter is replaced by writing a
//! sibling temporary file and renaming it over the note, so readers see either
//! the old header or the new one.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use papernote::{prelude::*, vault::FsVault};
//! use serde_yaml::Value;
//!
//! # async fn example() -> Result<(), PapernoteError> {
//! let vault = FsVault::new("/home/me/vault");
//! let note = vault.create(Path::new("papers/Example.md"), "").await?;
//! vault
//!   .process_front_matter(&note, &mut |front_matter| {
//!     front_matter.insert("status".into(), Value::from("unread"));
//!   })
//!   .await?;
//! vault.append(&note, "First thoughts.").await?;
//! # Ok(())
//! # }
//! ```

use tokio::{
  fs,
  io::AsyncWriteExt,
  sync::{Mutex as AsyncMutex, OwnedMutexGuard},
};

use super::*;
use crate::frontmatter::{FrontMatter, NoteDocument};

/// A note in a vault, addressed by its vault-relative path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteFile {
  /// Path relative to the vault root
  pub path: PathBuf,
}

/// The operations the workflow needs from a notes store.
#[async_trait]
pub trait Vault: Send + Sync {
  /// Returns the note at `path`, or `None` when there is none.
  async fn get_file_by_path(&self, path: &Path) -> Result<Option<NoteFile>>;

  /// Creates a note at `path` with `initial_body`. Fails if one already exists.
  async fn create(&self, path: &Path, initial_body: &str) -> Result<NoteFile>;

  /// Appends `text` to the end of the note.
  async fn append(&self, file: &NoteFile, text: &str) -> Result<()>;

  /// Applies `mutator` to the note's front matter as one atomic
  /// read-modify-write.
  async fn process_front_matter(
    &self,
    file: &NoteFile,
    mutator: &mut (dyn for<'m> FnMut(&'m mut FrontMatter) + Send),
  ) -> Result<()>;
}

/// Map from note path to the lock guarding writes to that note.
#[derive(Debug, Default)]
pub struct PathLocks {
  /// One async mutex per path that has ever been locked
  locks: std::sync::Mutex<HashMap<PathBuf, Arc<AsyncMutex<()>>>>,
}

impl PathLocks {
  /// Waits for exclusive access to `path`. Access lasts until the guard drops.
  ///
  /// Entries nobody holds or waits on are dropped here, so the map only keeps
  /// paths that are in use.
  pub async fn acquire(&self, path: &Path) -> OwnedMutexGuard<()> {
    let lock = {
      let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
      locks.retain(|_, lock| Arc::strong_count(lock) > 1);
      locks.entry(path.to_path_buf()).or_default().clone()
    };
    lock.lock_owned().await
  }

  /// Number of paths currently tracked.
  pub fn len(&self) -> usize { self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len() }

  /// Whether no paths are tracked.
  pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// A vault backed by a directory of markdown files.
#[derive(Debug)]
pub struct FsVault {
  /// Vault root directory
  root:  PathBuf,
  /// Per-note write serialization
  locks: PathLocks,
}

impl FsVault {
  /// Opens the vault rooted at `root`. The directory is created lazily.
  pub fn new(root: impl AsRef<Path>) -> Self {
    Self { root: root.as_ref().to_path_buf(), locks: PathLocks::default() }
  }

  /// Vault root directory.
  pub fn root(&self) -> &Path { &self.root }

  /// Absolute location of a vault-relative path.
  pub fn resolve(&self, path: &Path) -> PathBuf { self.root.join(path) }
}

#[async_trait]
impl Vault for FsVault {
  async fn get_file_by_path(&self, path: &Path) -> Result<Option<NoteFile>> {
    match fs::metadata(self.resolve(path)).await {
      Ok(metadata) if metadata.is_file() => Ok(Some(NoteFile { path: path.to_path_buf() })),
      Ok(_) => Ok(None),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(PapernoteError::file_operation(path)(e)),
    }
  }

  async fn create(&self, path: &Path, initial_body: &str) -> Result<NoteFile> {
    let full_path = self.resolve(path);
    if let Some(parent) = full_path.parent() {
      fs::create_dir_all(parent).await.map_err(PapernoteError::file_operation(path))?;
    }

    let _guard = self.locks.acquire(path).await;
    let mut file = fs::OpenOptions::new()
      .write(true)
      .create_new(true)
      .open(&full_path)
      .await
      .map_err(PapernoteError::file_operation(path))?;
    file.write_all(initial_body.as_bytes()).await.map_err(PapernoteError::file_operation(path))?;
    file.flush().await.map_err(PapernoteError::file_operation(path))?;

    info!("Created note {}", path.display());
    Ok(NoteFile { path: path.to_path_buf() })
  }

  async fn append(&self, file: &NoteFile, text: &str) -> Result<()> {
    let _guard = self.locks.acquire(&file.path).await;
    let mut handle = fs::OpenOptions::new()
      .append(true)
      .open(self.resolve(&file.path))
      .await
      .map_err(PapernoteError::file_operation(&file.path))?;
    handle.write_all(text.as_bytes()).await.map_err(PapernoteError::file_operation(&file.path))?;
    handle.flush().await.map_err(PapernoteError::file_operation(&file.path))?;
    trace!("Appended {} bytes to {}", text.len(), file.path.display());
    Ok(())
  }

  async fn process_front_matter(
    &self,
    file: &NoteFile,
    mutator: &mut (dyn for<'m> FnMut(&'m mut FrontMatter) + Send),
  ) -> Result<()> {
    let _guard = self.locks.acquire(&file.path).await;
    let full_path = self.resolve(&file.path);

    let content =
      fs::read_to_string(&full_path).await.map_err(PapernoteError::file_operation(&file.path))?;
    let mut note = NoteDocument::parse(&file.path, &content)?;
    mutator(&mut note.front_matter);
    let rendered = note.render()?;

    if rendered == content {
      trace!("Front matter of {} unchanged", file.path.display());
      return Ok(());
    }

    let temp_path = temp_sibling(&full_path);
    fs::write(&temp_path, rendered).await.map_err(PapernoteError::file_operation(&file.path))?;
    if let Err(e) = fs::rename(&temp_path, &full_path).await {
      let _ = fs::remove_file(&temp_path).await;
      return Err(PapernoteError::file_operation(&file.path)(e));
    }

    debug!("Updated front matter of {}", file.path.display());
    Ok(())
  }
}

/// `dir/.name.md.tmp` next to `path`.
fn temp_sibling(path: &Path) -> PathBuf {
  let name = path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default();
  path.with_file_name(format!(".{}.tmp", name))
}
