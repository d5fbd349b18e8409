//! YouTube Data API v3 search client.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{SearchError, VideoSearch};

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Public URL for a YouTube video id.
pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL_PREFIX}{video_id}")
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: ResultId,
}

#[derive(Debug, Deserialize)]
struct ResultId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct YouTubeSearch {
    client: Client,
    api_key: String,
    base_url: String,
}

impl YouTubeSearch {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self, SearchError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_key,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    /// Searches high-definition videos only.
    async fn search_videos(
        &self,
        query: &str,
        max_results: u32,
    ) -> Result<Vec<String>, SearchError> {
        let max_results = max_results.to_string();
        let response = self
            .client
            .get(format!("{}/search", self.base_url.trim_end_matches('/')))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("videoDefinition", "high"),
                ("maxResults", max_results.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: api_error_message(body),
            });
        }

        let ids = video_ids(&body)?;
        debug!("YouTube returned {} video ids for '{}'", ids.len(), query);
        Ok(ids)
    }
}

/// Video ids from a `search.list` response body, skipping channel/playlist hits.
fn video_ids(body: &str) -> Result<Vec<String>, SearchError> {
    let parsed: SearchListResponse =
        serde_json::from_str(body).map_err(|e| SearchError::Malformed(e.to_string()))?;
    Ok(parsed
        .items
        .into_iter()
        .filter_map(|item| item.id.video_id)
        .collect())
}

fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}
