//! Hacker News source backed by the Algolia search API.
//!
//! The API answers `GET /api/v1/search?query=...` with `{"hits": [...]}`;
//! most hit fields are nullable, so the raw hits are decoded into a loose
//! shape first and normalised into [`Story`] values by [`parse_response`].
//!
//! [`parse_response`]: HackerNewsSource::parse_response

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{Story, StoryId, StorySource};

/// Public search endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://hn.algolia.com/api/v1/search";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
struct Hit {
    #[serde(rename = "objectID")]
    object_id: String,
    title: Option<String>,
    url: Option<String>,
    author: Option<String>,
    num_comments: Option<u32>,
    points: Option<u32>,
}

impl From<Hit> for Story {
    fn from(hit: Hit) -> Self {
        Story {
            id: StoryId::new(hit.object_id),
            title: hit.title.unwrap_or_else(|| "(untitled)".to_string()),
            url: hit.url.unwrap_or_default(),
            author: hit.author.unwrap_or_default(),
            num_comments: hit.num_comments.unwrap_or(0),
            points: hit.points.unwrap_or(0),
        }
    }
}

/// Fetches one page of search results for a fixed query.
pub struct HackerNewsSource {
    client: reqwest::Client,
    endpoint: String,
    query: String,
}

impl HackerNewsSource {
    /// Create a source that searches the public endpoint for `query`.
    pub fn new(query: impl Into<String>) -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT, query)
    }

    pub fn with_endpoint(endpoint: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            query: query.into(),
        }
    }

    /// Decode a search response body into stories.
    ///
    /// Pure (no I/O) so that tests can exercise decoding without the network.
    pub fn parse_response(body: &str) -> Result<Vec<Story>> {
        let response: SearchResponse =
            serde_json::from_str(body).context("malformed search response")?;
        Ok(response.hits.into_iter().map(Story::from).collect())
    }
}

#[async_trait]
impl StorySource for HackerNewsSource {
    fn name(&self) -> &str {
        "hacker-news"
    }

    async fn fetch(&self) -> Result<Vec<Story>> {
        debug!(endpoint = %self.endpoint, query = %self.query, "requesting stories");
        let body = self
            .client
            .get(&self.endpoint)
            .query(&[("query", self.query.as_str())])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Self::parse_response(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
