//! Resource resolution — turns a step's search topic into a concrete URL.
//!
//! Provider failures never leave this module: every lookup ends in a
//! `Resolution`, and `Missing` is an ordinary outcome for the caller to render.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::schema::ResourceKind;

pub mod web_search;
pub mod youtube;

pub use web_search::ScrapingWebSearch;
pub use youtube::{watch_url, YouTubeSearch};

/// Appended to every video query.
pub const VIDEO_QUERY_SUFFIX: &str = "tutorial";
/// Appended to every reading query.
pub const READING_QUERY_SUFFIX: &str = "article tutorial";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected search response: {0}")]
    Malformed(String),
}

/// Video search provider. Returns provider video ids, best match first.
#[async_trait]
pub trait VideoSearch: Send + Sync {
    async fn search_videos(&self, query: &str, max_results: u32)
        -> Result<Vec<String>, SearchError>;
}

/// General web search provider. Returns result URLs, best match first.
#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        num_results: usize,
        lang: &str,
    ) -> Result<Vec<String>, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    NoResults,
    Provider(String),
}

/// Outcome of one lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(String),
    Missing(ResolutionFailure),
}

#[cfg(test)]
impl Resolution {
    pub fn url(self) -> Option<String> {
        match self {
            Resolution::Found(url) => Some(url),
            Resolution::Missing(_) => None,
        }
    }
}

#[async_trait]
pub trait ResourceResolver: Send + Sync {
    /// Looks up one resource for `topic`. `context` (the domain) narrows the query.
    async fn resolve(&self, topic: &str, kind: ResourceKind, context: &str) -> Resolution;
}

/// Joins the non-empty query parts with single spaces.
pub fn compose_query(topic: &str, context: &str, suffix: &str) -> String {
    [topic, context, suffix]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolver backed by a video search provider and a web search provider.
///
/// Web lookups are serialised and spaced at least `web_pause` apart.
pub struct SearchResolver {
    videos: Arc<dyn VideoSearch>,
    web: Arc<dyn WebSearch>,
    lang: String,
    web_pause: Duration,
    last_web_lookup: Mutex<Option<Instant>>,
}

impl SearchResolver {
    pub fn new(
        videos: Arc<dyn VideoSearch>,
        web: Arc<dyn WebSearch>,
        lang: impl Into<String>,
        web_pause: Duration,
    ) -> Self {
        Self {
            videos,
            web,
            lang: lang.into(),
            web_pause,
            last_web_lookup: Mutex::new(None),
        }
    }

    async fn resolve_video(&self, query: &str) -> Resolution {
        match self.videos.search_videos(query, 1).await {
            Ok(ids) => match ids.into_iter().find(|id| !id.trim().is_empty()) {
                Some(id) => Resolution::Found(watch_url(&id)),
                None => Resolution::Missing(ResolutionFailure::NoResults),
            },
            Err(e) => {
                warn!("Video search failed for '{query}': {e}");
                Resolution::Missing(ResolutionFailure::Provider(e.to_string()))
            }
        }
    }

    async fn resolve_reading(&self, query: &str) -> Resolution {
        let mut last = self.last_web_lookup.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.web_pause {
                tokio::time::sleep(self.web_pause - elapsed).await;
            }
        }

        let result = self.web.search(query, 1, &self.lang).await;
        *last = Some(Instant::now());

        match result {
            Ok(urls) => match urls.into_iter().find(|u| u.starts_with("http")) {
                Some(url) => Resolution::Found(url),
                None => Resolution::Missing(ResolutionFailure::NoResults),
            },
            Err(e) => {
                warn!("Web search failed for '{query}': {e}");
                Resolution::Missing(ResolutionFailure::Provider(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl ResourceResolver for SearchResolver {
    async fn resolve(&self, topic: &str, kind: ResourceKind, context: &str) -> Resolution {
        let query = match kind {
            ResourceKind::Video => compose_query(topic, context, VIDEO_QUERY_SUFFIX),
            ResourceKind::Reading => compose_query(topic, context, READING_QUERY_SUFFIX),
        };
        debug!("Resolving {:?} with query '{}'", kind, query);

        match kind {
            ResourceKind::Video => self.resolve_video(&query).await,
            ResourceKind::Reading => self.resolve_reading(&query).await,
        }
    }
}
