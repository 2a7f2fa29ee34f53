//! Search term broadcasting.
//!
//! Two streams carry the search term:
//!
//! - the **raw** stream on [`SearchInput`], which echoes every keystroke and
//!   is meant for UI echo only, and
//! - the **canonical** stream on [`SearchBroadcaster`], which only changes
//!   after input has been quiet for the debounce window and the settled value
//!   differs from the previous one. Catalog filtering subscribes here.
//!
//! ```text
//! keystrokes -> SearchInput::on_input -> raw echo
//!                      |
//!                  Debouncer (quiet window, distinct)
//!                      |
//!           SearchBroadcaster::update_search_term -> CatalogView
//! ```

mod debounce;

use std::time::Duration;

use tracing::debug;

use crate::reactive::{Subject, Subscription};

pub use debounce::Debouncer;

/// Default quiet window between the last keystroke and a canonical update.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Holder of the canonical search term.
///
/// Clones share the same term and subscribers.
#[derive(Debug, Clone)]
pub struct SearchBroadcaster {
    term: Subject<String>,
}

impl Default for SearchBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBroadcaster {
    /// Create a broadcaster holding the empty term.
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Subject::new(String::new()),
        }
    }

    /// Replace the current term and notify subscribers. A term equal to the
    /// current one is ignored.
    pub fn update_search_term(&self, term: impl Into<String>) {
        let term = term.into();
        if self.term.next_if_changed(term.clone()) {
            debug!(term = %term, "Search term updated");
        }
    }

    /// The current term.
    #[must_use]
    pub fn current_term(&self) -> String {
        self.term.get()
    }

    /// Subscribe to term changes; the callback receives the current term
    /// immediately.
    pub fn subscribe(&self, callback: impl Fn(&String) + Send + Sync + 'static) -> Subscription {
        self.term.subscribe(callback)
    }
}

/// Raw keystroke front end feeding a [`SearchBroadcaster`] through a
/// debounce stage.
#[derive(Debug)]
pub struct SearchInput {
    raw: Subject<String>,
    debouncer: Debouncer<String>,
}

impl SearchInput {
    /// Attach a new input to `broadcaster` with the given quiet window.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    #[must_use]
    pub fn spawn(broadcaster: &SearchBroadcaster, window: Duration) -> Self {
        let target = broadcaster.clone();
        let debouncer = Debouncer::spawn(window, move |term: String| {
            target.update_search_term(term);
        });

        Self {
            raw: Subject::new(String::new()),
            debouncer,
        }
    }

    /// Record a keystroke: echo it on the raw stream and schedule a
    /// canonical update.
    pub fn on_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.raw.next(text.clone());
        if !self.debouncer.push(text) {
            debug!("Search debounce task has stopped; input dropped");
        }
    }

    /// The latest raw input.
    #[must_use]
    pub fn raw_term(&self) -> String {
        self.raw.get()
    }

    /// Subscribe to the raw (undebounced) stream.
    pub fn subscribe_raw(&self, callback: impl Fn(&String) + Send + Sync + 'static) -> Subscription {
        self.raw.subscribe(callback)
    }
}
