//! `papernote add`: create or update the note for one work.

use super::*;

/// Arguments for [`Commands::Add`]
#[derive(Args, Clone, Debug)]
pub struct AddArgs {
  /// OpenAlex work id or URL, e.g. "W2741809807" or "https://openalex.org/W2741809807"
  pub identifier: String,
}

/// Runs [`Commands::Add`].
pub async fn add<I: UserInteraction>(interaction: &I, config: Config, args: AddArgs) -> Result<()> {
  let papernote = Papernote::from_config(config);
  write_note(interaction, &papernote, &args.identifier).await
}

/// Creates or updates the note for `identifier` and reports the outcome.
pub(crate) async fn write_note<I: UserInteraction>(
  interaction: &I,
  papernote: &Papernote,
  identifier: &str,
) -> Result<()> {
  interaction.reply(ResponseContent::Info(&format!("Fetching paper: {}", identifier)))?;
  let outcome = papernote.create_paper_note(identifier).await?;
  interaction.reply(ResponseContent::Note(&outcome))?;
  if outcome.paper.methods.is_none() && outcome.paper.datasets.is_none() {
    debug!("No implementation data for {}", outcome.paper.id);
  }
  Ok(())
}
