//! The record type every story source produces.
//!
//! `Story` is immutable once fetched: the application only ever removes
//! stories from its collection, it never edits them.  Every source converts
//! its native format into `Story` values so the reducer, the search filter
//! and the renderer stay source-agnostic.

use std::fmt;

/// Identity of a [`Story`] within one collection.
///
/// Hacker News uses string `objectID`s, so ids are strings everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoryId(String);

impl StoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for StoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A single story, normalised from any source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Story {
    /// Unique within a collection; removal is keyed on it.
    pub id: StoryId,

    /// Headline.  The only field the search filter looks at.
    pub title: String,

    /// Link to the story itself.
    pub url: String,

    pub author: String,

    pub num_comments: u32,

    pub points: u32,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Shorthand constructor for tests across the crate.
    pub(crate) fn make_story(id: &str, title: &str) -> Story {
        Story {
            id: StoryId::new(id),
            title: title.to_string(),
            url: format!("https://example.com/{id}"),
            author: "tester".to_string(),
            num_comments: 0,
            points: 0,
        }
    }

    #[test]
    fn story_id_displays_raw_value() {
        assert_eq!(StoryId::from("abc").to_string(), "abc");
    }
}
