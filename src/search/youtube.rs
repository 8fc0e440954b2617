//! YouTube Data API v3 search client.
//!
//! Calls `GET <base>/search?part=snippet&type=video&maxResults=N&q=...&key=...`
//! and keeps only the id and title of each hit.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

use super::{SearchError, SearchResultItem, VideoSearch};
use crate::core::config::{self, Config};

#[derive(Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Snippet,
}

#[derive(Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
}

/// Search backend talking to the YouTube Data API
pub struct YouTubeSearch {
    client: Client,
    base_url: Url,
    api_key: SecretString,
}

impl YouTubeSearch {
    pub fn new(base_url: Url, api_key: SecretString) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config::SEARCH_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, SearchError> {
        Self::new(
            config.youtube_api_url.clone(),
            SecretString::from(config.youtube_api_key.expose_secret().to_string()),
        )
    }

    fn search_url(&self) -> Result<Url, SearchError> {
        // Url::join would drop the last path segment without a trailing slash
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/search", base))?)
    }
}

#[async_trait]
impl VideoSearch for YouTubeSearch {
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<SearchResultItem>, SearchError> {
        let url = self.search_url()?;
        let limit = usize::from(max_results);
        let max_results = max_results.to_string();

        log::debug!("YouTube search: {:?} (maxResults={})", query, max_results);

        let response = self
            .client
            .get(url)
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("maxResults", max_results.as_str()),
                ("type", "video"),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await
            // The request URL carries the API key
            .map_err(|e| e.without_url())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let data: SearchListResponse = response.json().await.map_err(|e| e.without_url())?;

        // type=video should only yield videos, but skip anything without a videoId
        let items = data
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id.map(|id| (id, item.snippet.title)))
            .take(limit)
            .enumerate()
            .map(|(idx, (id, title))| SearchResultItem {
                id,
                title,
                position: idx + 1,
            })
            .collect();

        Ok(items)
    }
}
