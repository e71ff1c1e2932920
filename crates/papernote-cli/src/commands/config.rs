//! `papernote config`: print the configuration in effect.

use super::*;

/// Runs [`Commands::Config`].
pub async fn show_config<I: UserInteraction>(
  interaction: &I,
  config_path: &std::path::Path,
) -> Result<()> {
  let config = load_config(config_path)?;
  interaction.reply(ResponseContent::Info(&format!("Configuration file: {}", config_path.display())))?;
  interaction.reply(ResponseContent::Config(&config))?;
  Ok(())
}
