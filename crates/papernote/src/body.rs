//! Prose sections appended to a paper note's body.
//!
//! Sections come in a fixed order and are skipped when their field is disabled
//! or empty:
//!
//! 1. the abstract text
//! 2. `**Datasets:**` followed by links to each dataset
//! 3. `**Methods:**` followed by links to each method
//!
//! The composed text is only ever appended; earlier body content is never
//! rewritten.

use super::*;
use crate::merge::AggregatePaper;

/// Builds the text to append for `paper`.
///
/// `site` is the Papers with Code site root that dataset and method links hang
/// off (`{site}/dataset/{id}`, `{site}/method/{id}`).
pub fn compose(paper: &AggregatePaper, site: &str) -> String {
  let site = site.trim_end_matches('/');
  let mut text = String::new();

  if let Some(abstract_text) = paper.abstract_text.as_deref().filter(|text| !text.is_empty()) {
    text.push_str(abstract_text);
  }

  if let Some(datasets) = paper.datasets.as_deref().filter(|entries| !entries.is_empty()) {
    text.push_str(&section("Datasets", datasets, &format!("{}/dataset", site)));
  }

  if let Some(methods) = paper.methods.as_deref().filter(|entries| !entries.is_empty()) {
    text.push_str(&section("Methods", methods, &format!("{}/method", site)));
  }

  text
}

/// `\n\n**{heading}:** [label](base/id), ...`
fn section(heading: &str, entries: &[CatalogEntry], base: &str) -> String {
  let links: Vec<String> =
    entries.iter().map(|entry| format!("[{}]({}/{})", entry.label(), base, entry.id)).collect();
  format!("\n\n**{}:** {}", heading, links.join(", "))
}
