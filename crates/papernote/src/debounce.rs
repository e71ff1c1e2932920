//! Quiet-period coalescing for search-as-you-type.
//!
//! A [`Debouncer`] holds at most one pending timer. Every call replaces it: the
//! previous timer is aborted and that caller learns it was superseded, while the
//! new caller waits out a fresh quiet period. Only the last call in a burst gets
//! to do its work. Work that has already started is never cancelled; only
//! waiting timers are.
//!
//! [`Suggester`] puts a debouncer in front of OpenAlex autocomplete.
//!
//! ```no_run
//! use papernote::{debounce::Suggester, openalex::OpenAlexClient};
//!
//! # async fn example() -> Result<(), papernote::error::PapernoteError> {
//! let suggester = Suggester::new(OpenAlexClient::new());
//! if let Some(suggestions) = suggester.suggest("graph neural").await? {
//!   for suggestion in suggestions {
//!     println!("{}", suggestion.display_name);
//!   }
//! }
//! # Ok(())
//! # }
//! ```

use tokio::{sync::oneshot, task::JoinHandle};

use super::*;
use crate::openalex::{OpenAlexClient, Suggestion};

/// Default quiet period before a suggestion request goes out.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Coalesces bursts of calls into the last one.
#[derive(Debug)]
pub struct Debouncer {
  /// How long a call must go unsuperseded
  quiet:   Duration,
  /// The currently scheduled timer, if any
  pending: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
  /// Creates a debouncer with the given quiet period.
  pub fn new(quiet: Duration) -> Self { Self { quiet, pending: std::sync::Mutex::new(None) } }

  /// Waits out the quiet period.
  ///
  /// Returns `true` when no newer call arrived in the meantime, `false` when
  /// this call was superseded.
  pub async fn settle(&self) -> bool {
    let (fire, fired) = oneshot::channel();
    let quiet = self.quiet;
    let timer = tokio::spawn(async move {
      tokio::time::sleep(quiet).await;
      let _ = fire.send(());
    });

    let previous = self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).replace(timer);
    if let Some(previous) = previous {
      previous.abort();
    }

    fired.await.is_ok()
  }
}

impl Default for Debouncer {
  fn default() -> Self { Self::new(DEFAULT_QUIET_PERIOD) }
}

impl Drop for Debouncer {
  fn drop(&mut self) {
    if let Some(timer) = self.pending.get_mut().ok().and_then(Option::take) {
      timer.abort();
    }
  }
}

/// Debounced OpenAlex autocomplete.
#[derive(Debug)]
pub struct Suggester {
  /// Autocomplete client
  client:    OpenAlexClient,
  /// Timer shared by all queries
  debouncer: Debouncer,
}

impl Suggester {
  /// Creates a suggester with the default quiet period.
  pub fn new(client: OpenAlexClient) -> Self { Self { client, debouncer: Debouncer::default() } }

  /// Uses a different quiet period.
  pub fn with_quiet_period(mut self, quiet: Duration) -> Self {
    self.debouncer = Debouncer::new(quiet);
    self
  }

  /// Suggestions for `query`, or `None` if a newer query superseded it.
  ///
  /// An empty query answers immediately with no suggestions.
  pub async fn suggest(&self, query: &str) -> Result<Option<Vec<Suggestion>>> {
    if query.trim().is_empty() {
      return Ok(Some(Vec::new()));
    }
    if !self.debouncer.settle().await {
      trace!("Suggestion query \"{}\" superseded", query);
      return Ok(None);
    }
    self.client.autocomplete(query).await.map(Some)
  }
}
