//! Subcommands of the CLI.

use super::*;

pub mod add;
pub mod config;
pub mod init;
pub mod search;

pub use add::{add, AddArgs};
pub use config::show_config;
pub use init::{init, InitArgs, MetadataField};
pub use search::{search, SearchArgs};

/// Available commands
#[derive(Subcommand, Clone)]
pub enum Commands {
  /// Write a configuration file
  Init(InitArgs),

  /// Create or update the note for an OpenAlex work
  Add(AddArgs),

  /// Search OpenAlex by title and create a note for the chosen work
  Search(SearchArgs),

  /// Print the configuration in effect
  Config,
}
