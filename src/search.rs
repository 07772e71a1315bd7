//! The persisted search term and the title filter it drives.

use tracing::{debug, warn};

use crate::source::Story;
use crate::store::PersistentKeyStore;

/// Store key the search term lives under.
pub const DEFAULT_KEY: &str = "search";
/// Term used when nothing has been stored yet.
pub const DEFAULT_TERM: &str = "React";

/// One store key bound to an in-memory value.
///
/// The value is read once on creation and written back on every change,
/// without debouncing.  If the store fails, the term keeps working in memory
/// and persistence is switched off for the rest of the session.
pub struct SearchTermStore {
    store: Box<dyn PersistentKeyStore>,
    key: String,
    value: String,
    persistent: bool,
}

impl SearchTermStore {
    /// Bind `key`, starting from the stored value or `default_value`.
    pub fn create(
        store: Box<dyn PersistentKeyStore>,
        key: impl Into<String>,
        default_value: impl Into<String>,
    ) -> Self {
        let key = key.into();
        let value = match store.get(&key) {
            Ok(Some(stored)) => {
                debug!(key = %key, "restored search term");
                stored
            }
            Ok(None) => default_value.into(),
            Err(e) => {
                warn!(key = %key, error = %e, "could not read search term; using default");
                default_value.into()
            }
        };

        Self {
            store,
            key,
            value,
            persistent: true,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// `false` once a write has failed.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    /// Replace the term and write it through to the store.
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        if !self.persistent {
            return;
        }
        if let Err(e) = self.store.set(&self.key, &self.value) {
            warn!(
                key = %self.key,
                error = %e,
                "could not persist search term; continuing in memory only"
            );
            self.persistent = false;
        }
    }
}

/// Stories whose title contains `term`, ignoring case, in their original order.
///
/// An empty term matches every story.
pub fn search_stories<'a>(stories: &'a [Story], term: &str) -> Vec<&'a Story> {
    let needle = term.to_lowercase();
    stories
        .iter()
        .filter(|story| story.title.to_lowercase().contains(&needle))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
