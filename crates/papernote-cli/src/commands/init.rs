//! `papernote init`: write a configuration file.

use clap::ValueEnum;

use super::*;

/// Arguments for [`Commands::Init`]
#[derive(Args, Clone, Debug, Default)]
pub struct InitArgs {
  /// Vault root directory
  #[arg(long)]
  pub vault:     Option<PathBuf>,
  /// Folder inside the vault for paper notes
  #[arg(long)]
  pub folder:    Option<PathBuf>,
  /// Contact address sent to OpenAlex
  #[arg(long)]
  pub email:     Option<String>,
  /// Replace front matter properties that already exist in a note
  #[arg(long, action = ArgAction::SetTrue)]
  pub overwrite: bool,
  /// Metadata to leave out of notes (repeatable)
  #[arg(long, value_enum)]
  pub skip:      Vec<MetadataField>,
}

/// A metadata group that can be switched off.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetadataField {
  /// External identifiers
  Ids,
  /// Keywords
  Keywords,
  /// Abstract text
  Abstract,
  /// Author ids and names
  Authors,
  /// Papers with Code methods
  Methods,
  /// Papers with Code datasets
  Datasets,
}

impl MetadataField {
  /// Turns this group off in `preferences`.
  fn disable(self, preferences: &mut MetadataPreferences) {
    match self {
      MetadataField::Ids => preferences.ids = false,
      MetadataField::Keywords => preferences.keywords = false,
      MetadataField::Abstract => preferences.abstract_text = false,
      MetadataField::Authors => preferences.authors = false,
      MetadataField::Methods => preferences.methods = false,
      MetadataField::Datasets => preferences.datasets = false,
    }
  }
}

/// Runs [`Commands::Init`].
pub async fn init<I: UserInteraction>(
  interaction: &I,
  config_path: &std::path::Path,
  args: InitArgs,
) -> Result<()> {
  let InitArgs { vault, folder, email, overwrite, skip } = args;

  if config_path.exists()
    && !interaction.confirm(&format!(
      "A configuration already exists at {}. Replace it?",
      config_path.display()
    ))?
  {
    interaction.reply(ResponseContent::Info("Keeping the existing configuration"))?;
    return Ok(());
  }

  let defaults = Config::default();
  let vault = match vault {
    Some(vault) => vault,
    None => PathBuf::from(
      interaction.prompt("Vault directory", &defaults.vault_path.display().to_string())?,
    ),
  };
  let folder = match folder {
    Some(folder) => folder,
    None => PathBuf::from(
      interaction.prompt("Folder for paper notes", &defaults.paper_folder.display().to_string())?,
    ),
  };

  let mut metadata = MetadataPreferences::default();
  for field in skip {
    field.disable(&mut metadata);
  }

  let mut config = defaults
    .with_vault_path(&vault)
    .with_paper_folder(&folder)
    .with_overwrite(overwrite)
    .with_metadata(metadata);
  if let Some(email) = email {
    config = config.with_contact_email(email);
  }

  config.save(config_path)?;
  interaction.reply(ResponseContent::Success(&format!(
    "Configuration written to {}\nVault: {}\nPaper folder: {}",
    config_path.display(),
    vault.display(),
    folder.display()
  )))?;
  if config.contact_email().is_none() {
    interaction.reply(ResponseContent::Warning(
      "No contact email set. OpenAlex serves anonymous requests from a slower pool.",
    ))?;
  }
  Ok(())
}
