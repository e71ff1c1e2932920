//! Command line front end for `papernote`.
//!
//! ```bash
//! # Write a configuration file, asking for anything not passed as a flag
//! papernote init --vault ~/Documents/vault --email me@example.org
//!
//! # Create or update the note for one OpenAlex work
//! papernote add W2741809807
//!
//! # Search by title and pick a result
//! papernote search "attention is all you need"
//!
//! # Show the configuration in effect
//! papernote config
//! ```
//!
//! Use `-v` (repeatable) for more logging detail; `RUST_LOG` overrides it.

#![warn(missing_docs, clippy::missing_docs_in_private_items)]

use std::path::PathBuf;

use clap::{builder::ArgAction, Args, Parser, Subcommand};
use papernote::{
  config::{Config, MetadataPreferences},
  debounce::Suggester,
  error::PapernoteError,
  openalex::Suggestion,
  workflow::NoteOutcome,
  Papernote,
};
use thiserror::Error;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod error;
pub mod interaction;

use crate::{commands::*, error::*, interaction::*};

/// Command line arguments.
#[derive(Parser)]
#[command(author, version, about = "Turn academic papers into markdown vault notes")]
pub struct Cli {
  /// Verbose mode (-v, -vv, -vvv) for different levels of logging detail
  #[arg(short, long, action = ArgAction::Count, global = true, help = "Increase logging verbosity")]
  verbose: u8,

  /// Configuration file to use instead of the platform default
  #[arg(long, short, global = true)]
  config: Option<PathBuf>,

  /// The subcommand to execute
  #[command(subcommand)]
  command: Commands,

  /// Skip all prompts and accept defaults (mostly for testing)
  #[arg(long, hide = true, global = true)]
  accept_defaults: bool,
}

impl Cli {
  /// The configuration file this run reads and writes.
  fn config_path(&self) -> PathBuf { self.config.clone().unwrap_or_else(Config::default_path) }
}

/// Configures logging from the `-v` count.
///
/// - 0: error
/// - 1: warn
/// - 2: info
/// - 3: debug
/// - 4+: trace
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "error",
    1 => "warn",
    2 => "info",
    3 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

/// Loads the configuration file, or explains how to create one.
fn load_config(path: &std::path::Path) -> Result<Config> {
  if !path.exists() {
    return Err(PapernoteCliError::MissingConfig(path.to_path_buf()));
  }
  Ok(Config::load(path)?)
}

/// Runs the parsed command.
async fn run(cli: &Cli, interaction: &Terminal) -> Result<()> {
  let config_path = cli.config_path();
  trace!("Using configuration file {}", config_path.display());

  match &cli.command {
    Commands::Init(args) => init(interaction, &config_path, args.clone()).await,
    Commands::Add(args) => add(interaction, load_config(&config_path)?, args.clone()).await,
    Commands::Search(args) => search(interaction, load_config(&config_path)?, args.clone()).await,
    Commands::Config => show_config(interaction, &config_path).await,
  }
}

#[tokio::main]
async fn main() {
  let cli = Cli::parse();
  setup_logging(cli.verbose);

  let interaction = Terminal { accept_defaults: cli.accept_defaults };
  if let Err(e) = run(&cli, &interaction).await {
    debug!("Command failed: {:?}", e);
    let _ = interaction.reply(ResponseContent::Error(&e));
    std::process::exit(1);
  }
}
