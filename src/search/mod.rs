//! Video search provider abstraction
//!
//! The search flow only needs an ordered list of `(id, title)` pairs; the
//! provider's own relevance order is kept as-is.

pub mod youtube;

use async_trait::async_trait;
use thiserror::Error;

use crate::core::error::{AppError, AppResult, ArgumentKind};

pub use youtube::YouTubeSearch;

/// How many results a search asks for and renders
pub const MAX_RESULTS: u8 = 10;

/// One search hit as shown in the selection keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResultItem {
    /// Opaque provider id (the YouTube `videoId`)
    pub id: String,
    pub title: String,
    /// 1-based rank in the provider's ordering
    pub position: usize,
}

#[derive(Debug, Error)]
pub enum SearchError {
    /// Transport failure or undecodable body
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Non-2xx answer (bad key, quota exhausted, ...)
    #[error("search API returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Pluggable search backend
#[async_trait]
pub trait VideoSearch: Send + Sync {
    /// Runs a video-only search and returns at most `max_results` items,
    /// positioned from 1 in provider order.
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<SearchResultItem>, SearchError>;
}

/// Normalizes the raw command argument and runs the search.
///
/// Whitespace inside the query collapses to single spaces. A blank query never
/// reaches the provider; an empty result list comes back as `NoResults`.
pub async fn run_search(provider: &dyn VideoSearch, raw_query: &str) -> AppResult<Vec<SearchResultItem>> {
    let query = raw_query.split_whitespace().collect::<Vec<_>>().join(" ");
    if query.is_empty() {
        return Err(AppError::MissingArgument(ArgumentKind::Query));
    }

    log::info!("Searching for \"{}\"", query);
    let items = provider.search(&query, MAX_RESULTS).await?;
    log::debug!("Search for \"{}\" returned {} item(s)", query, items.len());

    if items.is_empty() {
        return Err(AppError::NoResults);
    }
    Ok(items)
}
