//! Offline source serving two built-in stories after a delay.
//!
//! Useful for trying the UI without network access, and for watching the
//! loading and error states: the delay is configurable and the source can be
//! told to fail.

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::{Story, StoryId, StorySource};

/// How long the demo source takes to answer unless told otherwise.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

pub struct DemoSource {
    delay: Duration,
    fail: bool,
}

impl DemoSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay, fail: false }
    }

    /// Make every fetch fail after the delay.
    pub fn failing(mut self, fail: bool) -> Self {
        self.fail = fail;
        self
    }

    /// The built-in collection, in the order it is served.
    pub fn stories() -> Vec<Story> {
        vec![
            Story {
                id: StoryId::new("0"),
                title: "React".into(),
                url: "https://reactjs.org/".into(),
                author: "Jordan Walke".into(),
                num_comments: 3,
                points: 4,
            },
            Story {
                id: StoryId::new("1"),
                title: "Redux".into(),
                url: "https://redux.js.org/".into(),
                author: "Dan Abramov, Andrew Clark".into(),
                num_comments: 2,
                points: 5,
            },
        ]
    }
}

impl Default for DemoSource {
    fn default() -> Self {
        Self::new(DEFAULT_DELAY)
    }
}

#[async_trait]
impl StorySource for DemoSource {
    fn name(&self) -> &str {
        "demo"
    }

    async fn fetch(&self) -> Result<Vec<Story>> {
        tokio::time::sleep(self.delay).await;
        if self.fail {
            bail!("demo source configured to fail");
        }
        Ok(Self::stories())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_builtin_stories_in_order() {
        let src = DemoSource::new(Duration::ZERO);
        let stories = src.fetch().await.unwrap();

        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].title, "React");
        assert_eq!(stories[1].title, "Redux");
        assert_ne!(stories[0].id, stories[1].id);
    }

    #[tokio::test]
    async fn failing_source_reports_error() {
        let src = DemoSource::new(Duration::ZERO).failing(true);
        assert!(src.fetch().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_configured_delay() {
        let src = DemoSource::default();
        let started = tokio::time::Instant::now();
        src.fetch().await.unwrap();
        assert!(started.elapsed() >= DEFAULT_DELAY);
    }
}
