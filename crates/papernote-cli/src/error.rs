//! Error types for the papernote CLI.

use super::*;

/// Result alias for CLI operations.
pub type Result<T> = core::result::Result<T, PapernoteCliError>;

/// Errors surfaced by CLI commands.
#[derive(Error, Debug)]
pub enum PapernoteCliError {
  /// Failure inside the papernote library
  #[error(transparent)]
  Papernote(#[from] PapernoteError),

  /// A terminal prompt failed
  #[error(transparent)]
  Dialog(#[from] dialoguer::Error),

  /// Terminal I/O failed
  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// No configuration file exists yet
  #[error("No configuration at {}. Run `papernote init` first.", .0.display())]
  MissingConfig(PathBuf),
}
