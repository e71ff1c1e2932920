//! Front matter projection, reconciliation and (de)serialization.
//!
//! A note's front matter is a YAML mapping fenced by `---` lines at the very top
//! of the file:
//!
//! ```markdown
//! ---
//! id: https://openalex.org/W2741809807
//! author_names:
//!   - Heather Piwowar
//! ---
//! Free text body.
//! ```
//!
//! Only a fixed allow-list of paper fields becomes properties, flattened so every
//! property is a scalar or a list of scalars:
//!
//! - `id`, `display_name`, `pdf_url`, `publication_year` as they are
//! - `keywords` as a list of display names
//! - each identifier under `ids` hoisted to its own property (`doi`, `mag`, ...)
//! - `authors` split into parallel `author_ids` and `author_names` lists

use super::*;
use crate::merge::AggregatePaper;

/// A note's structured header. Key order is preserved on round trips.
pub type FrontMatter = Mapping;

/// Flat properties derived from an [`AggregatePaper`], ready to reconcile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatterProjection {
  /// Property name to value, in projection order
  properties: Mapping,
}

/// A note split into its header and body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDocument {
  /// Parsed header; empty when the note has none
  pub front_matter: FrontMatter,
  /// Everything after the closing fence
  pub body:         String,
  /// Whether the note had a fenced header at all
  had_header:       bool,
}

impl FrontMatterProjection {
  /// Number of properties.
  pub fn len(&self) -> usize { self.properties.len() }

  /// Whether the projection has no properties.
  pub fn is_empty(&self) -> bool { self.properties.is_empty() }

  /// Looks up one property.
  pub fn get(&self, key: &str) -> Option<&YamlValue> { self.properties.get(key) }

  /// Iterates properties in projection order.
  pub fn iter(&self) -> impl Iterator<Item = (&YamlValue, &YamlValue)> { self.properties.iter() }

  /// Adds a property.
  fn insert(&mut self, key: &str, value: impl Into<YamlValue>) {
    self.properties.insert(YamlValue::String(key.to_string()), value.into());
  }
}

impl From<&AggregatePaper> for FrontMatterProjection {
  fn from(paper: &AggregatePaper) -> Self {
    let mut projection = FrontMatterProjection::default();

    projection.insert("id", paper.id.as_str());
    projection.insert("display_name", paper.display_name.as_str());
    if let Some(pdf_url) = &paper.pdf_url {
      projection.insert("pdf_url", pdf_url.as_str());
    }
    if let Some(year) = paper.publication_year {
      projection.insert("publication_year", year);
    }
    if let Some(keywords) = &paper.keywords {
      projection.insert("keywords", string_list(keywords.iter().map(String::as_str)));
    }
    if let Some(ids) = &paper.ids {
      for (name, value) in ids.entries() {
        projection.insert(name, value);
      }
    }
    if let Some(authors) = &paper.authors {
      projection.insert(
        "author_ids",
        string_list(authors.iter().map(|author| author.id.as_deref().unwrap_or_default())),
      );
      projection.insert(
        "author_names",
        string_list(authors.iter().map(|author| author.display_name.as_deref().unwrap_or_default())),
      );
    }

    projection
  }
}

/// Applies `projection` to `existing`.
///
/// A property is written when `existing` lacks it, or when `overwrite` is set;
/// otherwise the existing value is kept. Returns how many properties were
/// written.
///
/// # Examples
///
/// ```
/// use papernote::frontmatter::{reconcile, FrontMatter, FrontMatterProjection};
///
/// let mut existing: FrontMatter = serde_yaml::from_str("id: X").unwrap();
/// let projection = FrontMatterProjection::from(&papernote::merge::AggregatePaper {
///   id: "Y".into(),
///   display_name: "Z".into(),
///   ..Default::default()
/// });
///
/// reconcile(&mut existing, &projection, false);
/// assert_eq!(serde_yaml::to_string(&existing).unwrap(), "id: X\ndisplay_name: Z\n");
/// ```
pub fn reconcile(
  existing: &mut FrontMatter,
  projection: &FrontMatterProjection,
  overwrite: bool,
) -> usize {
  let mut written = 0;
  for (key, value) in projection.iter() {
    if overwrite || !existing.contains_key(key) {
      existing.insert(key.clone(), value.clone());
      written += 1;
    } else {
      trace!("Keeping existing property {:?}", key);
    }
  }
  written
}

impl NoteDocument {
  /// Splits note content into front matter and body.
  ///
  /// Content without an opening fence, or with an opening fence that is never
  /// closed, has no header: all of it is body.
  ///
  /// # Errors
  ///
  /// - [`PapernoteError::Yaml`] when the header is not valid YAML
  /// - [`PapernoteError::FrontMatter`] when it is valid YAML but not a mapping
  pub fn parse(path: &Path, content: &str) -> Result<Self> {
    let Some((header, body)) = split_fenced(content) else {
      return Ok(Self { front_matter: FrontMatter::new(), body: content.to_string(), had_header: false });
    };

    let front_matter = match serde_yaml::from_str::<YamlValue>(header)? {
      YamlValue::Null => FrontMatter::new(),
      YamlValue::Mapping(mapping) => mapping,
      _ => return Err(PapernoteError::FrontMatter(path.to_path_buf())),
    };

    Ok(Self { front_matter, body: body.to_string(), had_header: true })
  }

  /// Renders the note back to text.
  ///
  /// A note that had no header and still has no properties is rendered as its
  /// body alone.
  pub fn render(&self) -> Result<String> {
    if self.front_matter.is_empty() {
      return Ok(if self.had_header { format!("---\n---\n{}", self.body) } else { self.body.clone() });
    }
    let yaml = serde_yaml::to_string(&self.front_matter)?;
    Ok(format!("---\n{}---\n{}", yaml, self.body))
  }
}

/// Returns `(header, body)` when `content` opens with a closed `---` fence.
fn split_fenced(content: &str) -> Option<(&str, &str)> {
  let rest = content.strip_prefix("---\n").or_else(|| content.strip_prefix("---\r\n"))?;

  let mut offset = 0;
  for line in rest.split_inclusive('\n') {
    if line.trim_end_matches(['\r', '\n']) == "---" {
      return Some((&rest[..offset], &rest[offset + line.len()..]));
    }
    offset += line.len();
  }
  None
}

/// A YAML sequence of strings.
fn string_list<'a>(items: impl Iterator<Item = &'a str>) -> YamlValue {
  YamlValue::Sequence(items.map(|item| YamlValue::String(item.to_string())).collect())
}
