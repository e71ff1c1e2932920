//! Canonical bibliographic record and the OpenAlex wire shape it is built from.
//!
//! OpenAlex work objects are large; only a narrow slice of them is kept. The
//! wire shape [`RawWork`] names exactly the fields of interest, so everything
//! else in the response is dropped during deserialization. Every kept field is
//! optional on the wire and degrades to empty/absent in [`CanonicalPaper`].
//!
//! # Examples
//!
//! ```
//! use papernote::paper::CanonicalPaper;
//!
//! let body = br#"{
//!   "id": "https://openalex.org/W1",
//!   "display_name": "Attention Is All You Need",
//!   "abstract_inverted_index": {"Attention": [0], "matters": [1]},
//!   "authorships": [{"author": {"id": "https://openalex.org/A1", "display_name": "Ashish Vaswani"}}]
//! }"#;
//!
//! let paper = CanonicalPaper::from_response(body)?;
//! assert_eq!(paper.abstract_text, "Attention matters");
//! assert_eq!(paper.authors[0].display_name.as_deref(), Some("Ashish Vaswani"));
//! # Ok::<(), papernote::error::PapernoteError>(())
//! ```

use serde_json::Value as JsonValue;

use super::*;
use crate::decoder::{try_decode, InvertedIndex};

/// A paper's bibliographic metadata, normalized from OpenAlex.
///
/// `abstract_text` is always plain text: the inverted-index form never leaves
/// [`CanonicalPaper::from_response`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalPaper {
  /// OpenAlex work URL, e.g. `https://openalex.org/W2741809807`
  pub id:               String,
  /// The paper's title as OpenAlex displays it
  pub display_name:     String,
  /// Plain-text abstract, empty when OpenAlex has none
  #[serde(rename = "abstract")]
  pub abstract_text:    String,
  /// Cross-catalog identifiers
  pub ids:              PaperIds,
  /// Authors in byline order
  pub authors:          Vec<Author>,
  /// Keyword display names
  pub keywords:         Vec<String>,
  /// Link to a PDF, when OpenAlex knows one
  pub pdf_url:          Option<String>,
  /// Year of publication
  pub publication_year: Option<i64>,
}

/// Identifiers of one paper across catalogs.
///
/// Each child is hoisted to a top-level front matter property, so the field
/// names here are also property names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperIds {
  /// OpenAlex work URL
  #[serde(default, deserialize_with = "deserialize_loose_string")]
  pub openalex:       Option<String>,
  /// DOI URL
  #[serde(default, deserialize_with = "deserialize_loose_string")]
  pub doi:            Option<String>,
  /// Microsoft Academic Graph id
  #[serde(default, deserialize_with = "deserialize_loose_string")]
  pub mag:            Option<String>,
  /// PubMed id
  #[serde(default, deserialize_with = "deserialize_loose_string")]
  pub pmid:           Option<String>,
  /// PubMed Central id
  #[serde(default, deserialize_with = "deserialize_loose_string")]
  pub pmcid:          Option<String>,
  /// Papers with Code paper id, filled in by the merger
  #[serde(default, deserialize_with = "deserialize_loose_string")]
  pub paperswithcode: Option<String>,
}

/// A single author as OpenAlex reports it inside an authorship entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
  /// OpenAlex author URL
  #[serde(default)]
  pub id:           Option<String>,
  /// Author's name
  #[serde(default)]
  pub display_name: Option<String>,
  /// ORCID URL
  #[serde(default)]
  pub orcid:        Option<String>,
}

/// The slice of an OpenAlex work object that gets kept.
#[derive(Debug, Default, Deserialize)]
pub struct RawWork {
  /// Work URL
  #[serde(default)]
  id:                      Option<String>,
  /// Title
  #[serde(default)]
  display_name:            Option<String>,
  /// Identifiers
  #[serde(default)]
  ids:                     Option<PaperIds>,
  /// Authorship entries, each wrapping an `author` object
  #[serde(default)]
  authorships:             Option<Vec<RawAuthorship>>,
  /// Abstract as word positions
  #[serde(default)]
  abstract_inverted_index: Option<InvertedIndex>,
  /// Abstract as text, which OpenAlex itself never sends but mirrors might
  #[serde(default, rename = "abstract")]
  abstract_text:           Option<String>,
  /// Keywords, as objects or plain strings
  #[serde(default)]
  keywords:                Option<Vec<RawKeyword>>,
  /// Year of publication
  #[serde(default)]
  publication_year:        Option<i64>,
  /// Where the work is primarily hosted
  #[serde(default)]
  primary_location:        Option<RawLocation>,
  /// Best open-access copy
  #[serde(default)]
  best_oa_location:        Option<RawLocation>,
}

/// One entry of `authorships`.
#[derive(Debug, Deserialize)]
struct RawAuthorship {
  /// The nested author object
  #[serde(default)]
  author: Option<Author>,
}

/// A keyword entry. OpenAlex sends objects; older payloads send strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawKeyword {
  /// `{ "id": ..., "display_name": ..., "score": ... }`
  Named {
    /// Display form of the keyword
    display_name: String,
  },
  /// A bare keyword string
  Plain(String),
  /// Anything else is ignored
  Other(JsonValue),
}

/// A hosting location, reduced to its PDF link.
#[derive(Debug, Deserialize)]
struct RawLocation {
  /// Direct PDF link
  #[serde(default)]
  pdf_url: Option<String>,
}

impl CanonicalPaper {
  /// Parses an OpenAlex work response body into a canonical paper.
  ///
  /// # Errors
  ///
  /// Returns [`PapernoteError::MalformedResponse`] when the body is not a JSON
  /// object or a kept field has the wrong type. Absent fields are not errors.
  pub fn from_response(data: &[u8]) -> Result<Self> {
    let raw: RawWork = serde_json::from_slice(data)
      .map_err(|e| PapernoteError::MalformedResponse(format!("OpenAlex work: {}", e)))?;
    raw.try_into()
  }

  /// The OpenAlex work key (`W...`) of this paper.
  pub fn work_key(&self) -> Option<&str> { work_key(&self.id) }
}

impl TryFrom<RawWork> for CanonicalPaper {
  type Error = PapernoteError;

  fn try_from(raw: RawWork) -> Result<Self> {
    let abstract_text = match (raw.abstract_inverted_index, raw.abstract_text) {
      (Some(index), _) => try_decode(&index).ok_or_else(|| {
        PapernoteError::MalformedResponse(
          "OpenAlex work: abstract index positions are implausibly large".to_string(),
        )
      })?,
      (None, Some(text)) => text,
      (None, None) => String::new(),
    };

    let authors = raw
      .authorships
      .unwrap_or_default()
      .into_iter()
      .map(|authorship| authorship.author.unwrap_or_default())
      .collect();

    let keywords = raw
      .keywords
      .unwrap_or_default()
      .into_iter()
      .filter_map(|keyword| match keyword {
        RawKeyword::Named { display_name } => Some(display_name),
        RawKeyword::Plain(keyword) => Some(keyword),
        RawKeyword::Other(_) => None,
      })
      .collect();

    let pdf_url = [raw.primary_location, raw.best_oa_location]
      .into_iter()
      .flatten()
      .find_map(|location| location.pdf_url);

    Ok(CanonicalPaper {
      id: raw.id.unwrap_or_default(),
      display_name: raw.display_name.unwrap_or_default(),
      abstract_text,
      ids: raw.ids.unwrap_or_default(),
      authors,
      keywords,
      pdf_url,
      publication_year: raw.publication_year,
    })
  }
}

impl PaperIds {
  /// Present identifiers as `(name, value)` pairs, in a stable order.
  pub fn entries(&self) -> Vec<(&'static str, &str)> {
    [
      ("openalex", &self.openalex),
      ("doi", &self.doi),
      ("mag", &self.mag),
      ("pmid", &self.pmid),
      ("pmcid", &self.pmcid),
      ("paperswithcode", &self.paperswithcode),
    ]
    .into_iter()
    .filter_map(|(name, value)| value.as_deref().map(|value| (name, value)))
    .collect()
  }
}

/// Extracts the final path segment of an OpenAlex URL (`https://openalex.org/W1` → `W1`).
///
/// Bare keys pass through unchanged. Returns `None` for empty input.
pub fn work_key(id: &str) -> Option<&str> {
  id.trim().trim_end_matches('/').rsplit('/').next().filter(|key| !key.is_empty())
}

/// Accepts identifier values sent as either strings or numbers.
fn deserialize_loose_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where D: Deserializer<'de> {
  Ok(match Option::<JsonValue>::deserialize(deserializer)? {
    Some(JsonValue::String(s)) => Some(s),
    Some(JsonValue::Number(n)) => Some(n.to_string()),
    _ => None,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[traced_test]
  #[test]
  fn test_full_work_is_narrowed() {
    let body = br#"{
      "id": "https://openalex.org/W2741809807",
      "display_name": "The state of OA",
      "doi": "https://doi.org/10.7717/peerj.4375",
      "cited_by_count": 1200,
      "ids": {
        "openalex": "https://openalex.org/W2741809807",
        "doi": "https://doi.org/10.7717/peerj.4375",
        "mag": 2741809807,
        "pmid": "https://pubmed.ncbi.nlm.nih.gov/29456894"
      },
      "publication_year": 2018,
      "keywords": [{"id": "k1", "display_name": "Open access", "score": 0.6}, "Citation"],
      "primary_location": {"pdf_url": null},
      "best_oa_location": {"pdf_url": "https://peerj.com/articles/4375.pdf"},
      "authorships": [
        {"author_position": "first", "author": {"id": "https://openalex.org/A1", "display_name": "Heather Piwowar"}},
        {"author_position": "last", "author": {"id": "https://openalex.org/A2"}}
      ],
      "abstract_inverted_index": {"Despite": [0], "growing": [1], "interest": [2]}
    }"#;

    let paper = CanonicalPaper::from_response(body).unwrap();
    assert_eq!(paper.id, "https://openalex.org/W2741809807");
    assert_eq!(paper.display_name, "The state of OA");
    assert_eq!(paper.abstract_text, "Despite growing interest");
    assert_eq!(paper.ids.mag.as_deref(), Some("2741809807"));
    assert_eq!(paper.ids.paperswithcode, None);
    assert_eq!(paper.keywords, vec!["Open access", "Citation"]);
    assert_eq!(paper.pdf_url.as_deref(), Some("https://peerj.com/articles/4375.pdf"));
    assert_eq!(paper.publication_year, Some(2018));
    assert_eq!(paper.authors.len(), 2);
    assert_eq!(paper.authors[1].display_name, None);
  }

  #[test]
  fn test_missing_fields_degrade() {
    let paper = CanonicalPaper::from_response(br#"{"id": "https://openalex.org/W1"}"#).unwrap();
    assert_eq!(paper.abstract_text, "");
    assert!(paper.authors.is_empty());
    assert!(paper.keywords.is_empty());
    assert_eq!(paper.ids, PaperIds::default());
    assert_eq!(paper.pdf_url, None);
  }

  #[test]
  fn test_null_index_and_authorships() {
    let paper = CanonicalPaper::from_response(
      br#"{"id": "W1", "display_name": "T", "abstract_inverted_index": null, "authorships": null}"#,
    )
    .unwrap();
    assert_eq!(paper.abstract_text, "");
    assert!(paper.authors.is_empty());
  }

  #[test]
  fn test_plain_abstract_fallback() {
    let paper =
      CanonicalPaper::from_response(br#"{"id": "W1", "abstract": "Already text."}"#).unwrap();
    assert_eq!(paper.abstract_text, "Already text.");
  }

  #[test]
  fn test_overflowing_index_position_is_malformed() {
    let err = CanonicalPaper::from_response(
      br#"{"id": "W1", "display_name": "T", "abstract_inverted_index": {"x": [18446744073709551615]}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, PapernoteError::MalformedResponse(_)));

    let err = CanonicalPaper::from_response(
      br#"{"id": "W1", "abstract_inverted_index": {"a": [0], "b": [1000000000000]}}"#,
    )
    .unwrap_err();
    assert!(matches!(err, PapernoteError::MalformedResponse(_)));
  }

  #[test]
  fn test_not_an_object_is_malformed() {
    let err = CanonicalPaper::from_response(b"[1, 2, 3]").unwrap_err();
    assert!(matches!(err, PapernoteError::MalformedResponse(_)));

    let err = CanonicalPaper::from_response(b"<html>rate limited</html>").unwrap_err();
    assert!(matches!(err, PapernoteError::MalformedResponse(_)));
  }

  #[test]
  fn test_ids_entries_order() {
    let ids = PaperIds {
      openalex: Some("oa".into()),
      mag: Some("1".into()),
      paperswithcode: Some("pwc".into()),
      ..Default::default()
    };
    assert_eq!(ids.entries(), vec![("openalex", "oa"), ("mag", "1"), ("paperswithcode", "pwc")]);
  }

  #[test]
  fn test_work_key() {
    assert_eq!(work_key("https://openalex.org/W2741809807"), Some("W2741809807"));
    assert_eq!(work_key("W42"), Some("W42"));
    assert_eq!(work_key("https://openalex.org/W42/"), Some("W42"));
    assert_eq!(work_key("  "), None);
  }
}
