//! Abstract reconstruction from OpenAlex's inverted-index encoding.
//!
//! OpenAlex does not ship abstracts as text. Instead it sends a map from each
//! word to the positions it occupies:
//!
//! ```json
//! { "Deep": [0], "learning": [1, 4], "is": [2], "good": [3] }
//! ```
//!
//! [`decode`] lays those words back out in position order. Positions nobody
//! claims render as empty tokens, so a gap shows up as a run of spaces rather
//! than being closed up.

use super::*;

/// Word to zero-based positions. Ordered so decoding stays deterministic even
/// when two words claim the same slot.
pub type InvertedIndex = BTreeMap<String, Vec<usize>>;

/// Slack allowed between the number of positions an index lists and the
/// highest position it claims. Anything sparser is not a real abstract.
const GAP_ALLOWANCE: usize = 1024;

/// Converts an inverted index back into linear text.
///
/// Slots are joined with single spaces. An empty index, or one whose words
/// carry no positions at all, decodes to the empty string. An index too sparse
/// to be an abstract (see [`try_decode`]) also decodes to the empty string.
///
/// # Examples
///
/// ```
/// use papernote::decoder::{decode, InvertedIndex};
///
/// let mut index = InvertedIndex::new();
/// index.insert("a".into(), vec![0]);
/// index.insert("b".into(), vec![2]);
/// assert_eq!(decode(&index), "a  b");
/// ```
pub fn decode(index: &InvertedIndex) -> String { try_decode(index).unwrap_or_default() }

/// Like [`decode`], but returns `None` for an index whose highest position is
/// out of all proportion to the positions it lists (more than
/// `4 * positions + 1024`). Such an index would otherwise need a buffer sized
/// by that one stray position.
pub fn try_decode(index: &InvertedIndex) -> Option<String> {
  let Some(max_index) = index.values().flatten().copied().max() else {
    return Some(String::new());
  };

  let listed: usize = index.values().map(Vec::len).sum();
  let limit = listed.saturating_mul(4).saturating_add(GAP_ALLOWANCE);
  if max_index > limit {
    return None;
  }

  let mut slots: Vec<&str> = vec![""; max_index.checked_add(1)?];
  for (word, positions) in index {
    for &position in positions {
      slots[position] = word;
    }
  }

  Some(slots.join(" "))
}
