//! Combining the bibliographic record and the implementation record.
//!
//! Preferences are applied while the aggregate is assembled: a disabled field is
//! simply never filled in, so there is no later path by which it could leak into
//! a note. Methods and datasets are also filtered upstream, since
//! [`PapersWithCodeClient::lookup`](crate::paperswithcode::PapersWithCodeClient::lookup)
//! does not request them when their preference is off.

use super::*;

/// Everything known about a paper after merging, restricted to the enabled
/// preferences.
///
/// Fields controlled by [`MetadataPreferences`] are `None` when disabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatePaper {
  /// OpenAlex work URL
  pub id:               String,
  /// Title
  pub display_name:     String,
  /// Year of publication
  #[serde(skip_serializing_if = "Option::is_none")]
  pub publication_year: Option<i64>,
  /// Best known PDF link
  #[serde(skip_serializing_if = "Option::is_none")]
  pub pdf_url:          Option<String>,
  /// Catalog identifiers, including the Papers with Code id when matched
  #[serde(skip_serializing_if = "Option::is_none")]
  pub ids:              Option<PaperIds>,
  /// Keyword display names
  #[serde(skip_serializing_if = "Option::is_none")]
  pub keywords:         Option<Vec<String>>,
  /// Plain-text abstract
  #[serde(rename = "abstract", skip_serializing_if = "Option::is_none")]
  pub abstract_text:    Option<String>,
  /// Authors in byline order
  #[serde(skip_serializing_if = "Option::is_none")]
  pub authors:          Option<Vec<Author>>,
  /// Linked methods
  #[serde(skip_serializing_if = "Option::is_none")]
  pub methods:          Option<Vec<CatalogEntry>>,
  /// Linked datasets
  #[serde(skip_serializing_if = "Option::is_none")]
  pub datasets:         Option<Vec<CatalogEntry>>,
}

/// Merges a paper with its (optional) implementation record under `preferences`.
///
/// When an implementation record is present its id becomes
/// `ids.paperswithcode`, and its PDF link (conference copy first) replaces the
/// bibliographic one.
pub fn merge(
  paper: CanonicalPaper,
  implementation: Option<ImplementationRecord>,
  preferences: &MetadataPreferences,
) -> AggregatePaper {
  let CanonicalPaper {
    id,
    display_name,
    abstract_text,
    mut ids,
    authors,
    keywords,
    mut pdf_url,
    publication_year,
  } = paper;

  let (mut methods, mut datasets) = (None, None);
  if let Some(implementation) = implementation {
    debug!("Merging Papers with Code record {}", implementation.id);
    if let Some(url) = implementation.pdf_url() {
      pdf_url = Some(url.to_string());
    }
    ids.paperswithcode = Some(implementation.id);
    methods = implementation.methods;
    datasets = implementation.datasets;
  }

  AggregatePaper {
    id,
    display_name,
    publication_year,
    pdf_url,
    ids: preferences.ids.then_some(ids),
    keywords: preferences.keywords.then_some(keywords),
    abstract_text: preferences.abstract_text.then_some(abstract_text),
    authors: preferences.authors.then_some(authors),
    methods: methods.filter(|_| preferences.methods),
    datasets: datasets.filter(|_| preferences.datasets),
  }
}
