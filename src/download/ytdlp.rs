//! yt-dlp backed stream resolution and transfer.
//!
//! Resolution runs `yt-dlp --dump-json` and reads the `formats` array;
//! transfer runs `yt-dlp -f <format_id> -o <dest>` for the chosen format.
//! Both calls are bounded by the configured yt-dlp timeout.

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;
use url::Url;

use super::error::DownloadError;
use super::stream::StreamDescriptor;
use super::ytdlp_errors::YtDlpErrorType;
use super::{ResolvedVideo, StreamProvider};
use crate::core::config::Config;

/// Stream provider backed by the yt-dlp binary
pub struct YtDlpProvider {
    ytdl_bin: String,
    timeout: Duration,
}

impl YtDlpProvider {
    pub fn new(ytdl_bin: impl Into<String>, timeout: Duration) -> Self {
        Self {
            ytdl_bin: ytdl_bin.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ytdl_bin.clone(), config.ytdlp_timeout)
    }

    /// Runs yt-dlp with `args`, killing it if it outlives the timeout.
    async fn run(&self, args: &[&str]) -> Result<Output, DownloadError> {
        log::debug!("yt-dlp command: {} {}", self.ytdl_bin, args.join(" "));

        let mut command = TokioCommand::new(&self.ytdl_bin);
        command.args(args).kill_on_drop(true);

        let output = match timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(DownloadError::Process(format!(
                    "Failed to execute {}: {}",
                    self.ytdl_bin, e
                )))
            }
            Err(_) => {
                return Err(DownloadError::Timeout(format!(
                    "yt-dlp timed out after {:?}",
                    self.timeout
                )))
            }
        };

        if output.status.success() {
            return Ok(output);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let error_type = YtDlpErrorType::analyze(&stderr);
        log::error!("yt-dlp failed ({:?}), error type: {:?}", output.status.code(), error_type);
        log::error!("yt-dlp stderr: {}", stderr);

        Err(DownloadError::from_ytdlp_stderr(&stderr))
    }
}

#[async_trait]
impl StreamProvider for YtDlpProvider {
    async fn resolve(&self, url: &Url) -> Result<ResolvedVideo, DownloadError> {
        // `--` keeps a URL that starts with a dash from being read as an option
        let args = ["--dump-json", "--no-playlist", "--no-warnings", "--", url.as_str()];
        let output = self.run(&args).await?;

        let json: Value = serde_json::from_slice(&output.stdout)?;
        let video = parse_video_info(&json, url)?;

        log::info!(
            "Resolved {} → \"{}\" with {} format(s)",
            url,
            video.title,
            video.streams.len()
        );

        Ok(video)
    }

    async fn fetch(
        &self,
        video: &ResolvedVideo,
        stream: &StreamDescriptor,
        dest: &Path,
    ) -> Result<(), DownloadError> {
        let dest_str = dest.to_string_lossy();
        let args = [
            "-f",
            stream.format_id.as_str(),
            "--no-playlist",
            "--no-part",
            "--no-warnings",
            "--no-progress",
            "-o",
            &*dest_str,
            "--",
            video.url.as_str(),
        ];
        self.run(&args).await?;

        if !tokio::fs::try_exists(dest).await.unwrap_or(false) {
            return Err(DownloadError::FileNotFound(format!(
                "yt-dlp reported success but {} is missing",
                dest.display()
            )));
        }

        Ok(())
    }
}

/// Builds a [`ResolvedVideo`] from yt-dlp's `--dump-json` document.
pub fn parse_video_info(json: &Value, url: &Url) -> Result<ResolvedVideo, DownloadError> {
    let title = json
        .get("title")
        .and_then(|v| v.as_str())
        .ok_or_else(|| DownloadError::Parse("yt-dlp JSON has no title".to_string()))?
        .to_string();

    let streams = json
        .get("formats")
        .and_then(|v| v.as_array())
        .map(|formats| formats.iter().filter_map(parse_format).collect())
        .unwrap_or_default();

    Ok(ResolvedVideo {
        url: url.clone(),
        title,
        streams,
    })
}

fn parse_format(format: &Value) -> Option<StreamDescriptor> {
    let format_id = format.get("format_id").and_then(|v| v.as_str())?.to_string();
    let container = format.get("ext").and_then(|v| v.as_str()).unwrap_or("").to_string();

    // A missing codec field means yt-dlp does not know; treat it as absent
    let has_codec = |key: &str| {
        format
            .get(key)
            .and_then(|v| v.as_str())
            .is_some_and(|codec| !codec.is_empty() && codec != "none")
    };
    let progressive = has_codec("vcodec") && has_codec("acodec");

    let height = format
        .get("height")
        .and_then(|v| v.as_u64())
        .and_then(|h| u32::try_from(h).ok());

    let size_bytes = ["filesize", "filesize_approx"]
        .iter()
        .filter_map(|key| format.get(*key))
        .find_map(|v| v.as_u64().or_else(|| v.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)));

    Some(StreamDescriptor {
        format_id,
        container,
        progressive,
        height,
        size_bytes,
    })
}
