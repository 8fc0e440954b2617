//! Common test utilities
//!
//! Fake providers with call counters and a config fixture, shared across the
//! integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use url::Url;

use ytrelay::core::Config;
use ytrelay::download::error::DownloadError;
use ytrelay::download::stream::StreamDescriptor;
use ytrelay::download::{ResolvedVideo, StreamProvider};
use ytrelay::search::{SearchError, SearchResultItem, VideoSearch};
use ytrelay::telegram::HandlerDeps;

pub const MIB: u64 = 1024 * 1024;

/// Config built from a fixed set of variables, staging into `temp_dir`
pub fn test_config(temp_dir: &Path) -> Config {
    let temp_dir = temp_dir.to_string_lossy().to_string();
    Config::from_lookup(|key| match key {
        "TELEGRAM_TOKEN" => Some("123456:TEST-TOKEN".to_string()),
        "YOUTUBE_API_KEY" => Some("test-api-key".to_string()),
        "DOMAIN" => Some("bot.example.com".to_string()),
        "TEMP_FILES_DIR" => Some(temp_dir.clone()),
        _ => None,
    })
    .unwrap()
}

pub fn items(titles: &[&str]) -> Vec<SearchResultItem> {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| SearchResultItem {
            id: format!("vid{}", i + 1),
            title: title.to_string(),
            position: i + 1,
        })
        .collect()
}

/// Search provider returning canned items, or a failure
pub struct FakeSearch {
    items: Vec<SearchResultItem>,
    fail: bool,
    calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl FakeSearch {
    pub fn returning(items: Vec<SearchResultItem>) -> Self {
        Self {
            items,
            fail: false,
            calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::returning(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoSearch for FakeSearch {
    async fn search(&self, query: &str, max_results: u8) -> Result<Vec<SearchResultItem>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push(query.to_string());
        if self.fail {
            return Err(SearchError::Status {
                status: 403,
                body: "quotaExceeded".to_string(),
            });
        }
        Ok(self.items.iter().take(usize::from(max_results)).cloned().collect())
    }
}

/// Stream provider with a fixed stream list; `fetch` writes a few bytes
pub struct FakeStreams {
    title: String,
    streams: Vec<StreamDescriptor>,
    resolve_error: Option<String>,
    fail_transfer: bool,
    resolves: AtomicUsize,
    fetches: AtomicUsize,
    fetched_to: Mutex<Vec<PathBuf>>,
}

impl FakeStreams {
    pub fn with_streams(title: &str, streams: Vec<StreamDescriptor>) -> Self {
        Self {
            title: title.to_string(),
            streams,
            resolve_error: None,
            fail_transfer: false,
            resolves: AtomicUsize::new(0),
            fetches: AtomicUsize::new(0),
            fetched_to: Mutex::new(Vec::new()),
        }
    }

    pub fn unavailable(stderr: &str) -> Self {
        Self {
            resolve_error: Some(stderr.to_string()),
            ..Self::with_streams("", Vec::new())
        }
    }

    /// Resolves fine, but the transfer dies after writing part of the file
    pub fn broken_transfer(title: &str, streams: Vec<StreamDescriptor>) -> Self {
        Self {
            fail_transfer: true,
            ..Self::with_streams(title, streams)
        }
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn fetched_to(&self) -> Vec<PathBuf> {
        self.fetched_to.lock().unwrap().clone()
    }
}

#[async_trait]
impl StreamProvider for FakeStreams {
    async fn resolve(&self, url: &Url) -> Result<ResolvedVideo, DownloadError> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        if let Some(stderr) = &self.resolve_error {
            return Err(DownloadError::from_ytdlp_stderr(stderr));
        }
        Ok(ResolvedVideo {
            url: url.clone(),
            title: self.title.clone(),
            streams: self.streams.clone(),
        })
    }

    async fn fetch(&self, _video: &ResolvedVideo, _stream: &StreamDescriptor, dest: &Path) -> Result<(), DownloadError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        tokio::fs::write(dest, b"\x00\x00\x00\x18ftypmp42").await?;
        self.fetched_to.lock().unwrap().push(dest.to_path_buf());
        if self.fail_transfer {
            return Err(DownloadError::from_ytdlp_stderr("ERROR: unable to download video data: Connection reset by peer"));
        }
        Ok(())
    }
}

pub fn progressive_mp4(format_id: &str, height: u32, size_bytes: Option<u64>) -> StreamDescriptor {
    StreamDescriptor {
        format_id: format_id.to_string(),
        container: "mp4".to_string(),
        progressive: true,
        height: Some(height),
        size_bytes,
    }
}

pub fn video_only(format_id: &str, height: u32) -> StreamDescriptor {
    StreamDescriptor {
        format_id: format_id.to_string(),
        container: "mp4".to_string(),
        progressive: false,
        height: Some(height),
        size_bytes: Some(MIB),
    }
}

pub fn deps(config: Config, search: Arc<FakeSearch>, streams: Arc<FakeStreams>) -> HandlerDeps {
    HandlerDeps::new(Arc::new(config), search, streams)
}
