//! Story source abstraction layer.
//!
//! This module defines the [`StorySource`] trait and the [`Story`] record.
//! Concrete sources live in sub-modules: [`demo`] serves a fixed pair of
//! stories after a delay, [`hacker_news`] queries the Hacker News search API.
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lobsters.rs`).
//! 2. Define a struct and implement [`StorySource`] for it.
//! 3. Add `mod lobsters;` below and re-export your struct in the `pub use` block.
//! 4. Add a variant to [`crate::config::SourceKind`] and construct it in
//!    `main.rs`.
//!
//! The fetch lifecycle, reducer, filter and UI are all source-agnostic.

mod demo;
mod hacker_news;
mod story;

pub use demo::DemoSource;
pub use hacker_news::HackerNewsSource;
pub use story::{Story, StoryId};

#[cfg(test)]
pub(crate) use story::tests::make_story;

use anyhow::Result;
use async_trait::async_trait;

/// Trait that every story source must implement.
///
/// [`crate::fetch::FetchLifecycle`] awaits [`fetch()`](StorySource::fetch)
/// on the tokio runtime, so implementations must be `Send + Sync`.
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// #[async_trait]
/// impl StorySource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     async fn fetch(&self) -> Result<Vec<Story>> {
///         // Perform HTTP / IO, then convert into Story values.
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Human-readable label shown in the status bar.
    fn name(&self) -> &str;

    /// Retrieve the whole collection in one call.
    ///
    /// Any error collapses into a single failure signal in the view state;
    /// the message only ends up in the log.
    async fn fetch(&self) -> Result<Vec<Story>>;
}
