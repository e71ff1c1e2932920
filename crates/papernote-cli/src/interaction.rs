//! Terminal prompts and replies.

use console::style;
use dialoguer::{Confirm, Input, Select};

use super::*;

/// Prefix for information messages
pub static INFO_PREFIX: &str = "ℹ ";
/// Prefix for success messages
pub static SUCCESS_PREFIX: &str = "✓ ";
/// Prefix for error messages
pub static ERROR_PREFIX: &str = "✗ ";
/// Prefix for warning messages
pub static WARNING_PREFIX: &str = "! ";
/// Branch of a listing
pub static ITEM_PREFIX: &str = "├─";
/// Last branch of a listing
pub static LAST_ITEM_PREFIX: &str = "└─";

/// Something to show the user.
#[derive(Debug)]
pub enum ResponseContent<'a> {
  /// Search suggestions
  Suggestions(&'a [Suggestion]),
  /// A note that was written
  Note(&'a NoteOutcome),
  /// Settings in effect
  Config(&'a Config),
  /// Something worked
  Success(&'a str),
  /// Neutral information
  Info(&'a str),
  /// Something the user should look at
  Warning(&'a str),
  /// A failed command
  Error(&'a PapernoteCliError),
}

/// How commands talk to the user.
pub trait UserInteraction {
  /// Asks a yes/no question.
  fn confirm(&self, message: &str) -> Result<bool>;
  /// Asks for a line of text, offering `default`.
  fn prompt(&self, message: &str, default: &str) -> Result<String>;
  /// Lets the user pick one of `items`. `None` means the prompt was dismissed.
  fn select(&self, message: &str, items: &[String]) -> Result<Option<usize>>;
  /// Prints a response.
  fn reply(&self, content: ResponseContent) -> Result<()>;
}

/// Interactive terminal. With `accept_defaults` every prompt takes its default
/// (or first) answer without asking.
pub struct Terminal {
  /// Answer every prompt with its default
  pub accept_defaults: bool,
}

impl UserInteraction for Terminal {
  fn confirm(&self, message: &str) -> Result<bool> {
    if self.accept_defaults {
      return Ok(true);
    }
    Ok(Confirm::new().with_prompt(message).default(false).interact()?)
  }

  fn prompt(&self, message: &str, default: &str) -> Result<String> {
    if self.accept_defaults {
      return Ok(default.to_string());
    }
    Ok(Input::<String>::new().with_prompt(message).default(default.to_string()).interact_text()?)
  }

  fn select(&self, message: &str, items: &[String]) -> Result<Option<usize>> {
    if items.is_empty() {
      return Ok(None);
    }
    if self.accept_defaults {
      return Ok(Some(0));
    }
    Ok(Select::new().with_prompt(message).items(items).default(0).interact_opt()?)
  }

  fn reply(&self, content: ResponseContent) -> Result<()> {
    match content {
      ResponseContent::Suggestions(suggestions) => {
        println!("{} Found {} papers:", style(INFO_PREFIX).blue(), suggestions.len());
        for (i, suggestion) in suggestions.iter().enumerate() {
          let prefix = if i + 1 == suggestions.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!("   {} {}", style(prefix).dim(), suggestion_label(suggestion));
        }
      },
      ResponseContent::Note(outcome) => {
        println!(
          "{} {} note {} ({} properties written)",
          style(SUCCESS_PREFIX).green(),
          if outcome.created { "Created" } else { "Updated" },
          style(outcome.path.display()).yellow(),
          outcome.properties
        );
      },
      ResponseContent::Config(config) => {
        let metadata = config.metadata;
        let enabled: Vec<&str> = [
          ("ids", metadata.ids),
          ("keywords", metadata.keywords),
          ("abstract", metadata.abstract_text),
          ("authors", metadata.authors),
          ("methods", metadata.methods),
          ("datasets", metadata.datasets),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect();
        let rows = [
          ("Vault", config.vault_path.display().to_string()),
          ("Paper folder", config.paper_folder.display().to_string()),
          ("Contact email", config.contact_email().unwrap_or("(none)").to_string()),
          ("Overwrite", config.overwrite.to_string()),
          ("OpenAlex", config.openalex_url.clone()),
          ("Papers with Code", config.paperswithcode_url.clone()),
          ("Metadata", enabled.join(", ")),
        ];
        for (i, (name, value)) in rows.iter().enumerate() {
          let prefix = if i + 1 == rows.len() { LAST_ITEM_PREFIX } else { ITEM_PREFIX };
          println!("   {} {}: {}", style(prefix).dim(), style(name).bold(), value);
        }
      },
      ResponseContent::Success(message) => println!("{} {}", style(SUCCESS_PREFIX).green(), message),
      ResponseContent::Info(message) => println!("{} {}", style(INFO_PREFIX).blue(), message),
      ResponseContent::Warning(message) =>
        println!("{} {}", style(WARNING_PREFIX).yellow(), style(message).yellow()),
      ResponseContent::Error(error) =>
        eprintln!("{} {}", style(ERROR_PREFIX).red(), style(error).red()),
    }
    Ok(())
  }
}

/// One-line description of a suggestion: title, hint and citation count.
pub fn suggestion_label(suggestion: &Suggestion) -> String {
  let mut label = suggestion.display_name.clone();
  if let Some(hint) = suggestion.hint.as_deref().filter(|hint| !hint.is_empty()) {
    label.push_str(&format!(" ({})", hint));
  }
  if let Some(count) = suggestion.cited_by_count {
    label.push_str(&format!(" | citations: {}", count));
  }
  label
}
