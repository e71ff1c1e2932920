//! `papernote search`: find a work by title and write its note.

use super::*;

/// Arguments for [`Commands::Search`]
#[derive(Args, Clone, Debug)]
pub struct SearchArgs {
  /// Title words to search for; asked for when omitted
  pub query: Option<String>,

  /// Take the top result without asking
  #[arg(long, action = ArgAction::SetTrue)]
  pub first: bool,
}

/// Runs [`Commands::Search`].
pub async fn search<I: UserInteraction>(
  interaction: &I,
  config: Config,
  args: SearchArgs,
) -> Result<()> {
  let SearchArgs { query, first } = args;
  let query = match query {
    Some(query) => query,
    None => interaction.prompt("Search for a paper", "")?,
  };

  let papernote = Papernote::from_config(config);
  let suggester = Suggester::new(papernote.openalex().clone());
  let suggestions = suggester.suggest(&query).await?.unwrap_or_default();

  if suggestions.is_empty() {
    interaction.reply(ResponseContent::Info(&format!("No papers found for \"{}\"", query)))?;
    return Ok(());
  }

  let chosen = if first {
    Some(0)
  } else {
    interaction.reply(ResponseContent::Suggestions(&suggestions))?;
    let labels: Vec<String> = suggestions.iter().map(suggestion_label).collect();
    interaction.select("Create a note for", &labels)?
  };

  let Some(index) = chosen else {
    interaction.reply(ResponseContent::Info("No paper selected"))?;
    return Ok(());
  };
  let suggestion = &suggestions[index];
  debug!("Selected {} \"{}\"", suggestion.id, suggestion.display_name);

  add::write_note(interaction, &papernote, &suggestion.id).await
}
