//! Download flow: stream resolution, selection and local staging
//!
//! Nothing here talks to Telegram; `telegram::handlers` drives these pieces
//! and turns their typed outcomes into chat replies.

pub mod error;
pub mod staging;
pub mod stream;
pub mod ytdlp;
pub mod ytdlp_errors;

use async_trait::async_trait;
use std::path::Path;
use url::Url;

use crate::core::error::{AppError, AppResult};
use error::DownloadError;
use stream::{select_best_stream, StreamDescriptor};

// Re-exports for convenience
pub use staging::stage_and_forward;
pub use ytdlp::YtDlpProvider;

/// A video resolved by the provider together with its available streams
#[derive(Debug, Clone)]
pub struct ResolvedVideo {
    pub url: Url,
    pub title: String,
    pub streams: Vec<StreamDescriptor>,
}

/// Pluggable stream backend
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Looks the URL up and lists its streams
    async fn resolve(&self, url: &Url) -> Result<ResolvedVideo, DownloadError>;

    /// Writes the bytes of `stream` to `dest`
    async fn fetch(&self, video: &ResolvedVideo, stream: &StreamDescriptor, dest: &Path)
        -> Result<(), DownloadError>;
}

/// Parses the user-supplied URL; only http(s) is accepted.
pub fn parse_video_url(raw: &str) -> Result<Url, DownloadError> {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(DownloadError::InvalidUrl(raw.to_string())),
    }
}

/// Resolves `raw_url` and picks the stream to send.
///
/// Fails with `NoSuitableStream` when there is no progressive MP4 and with
/// `SizeExceeded` when the best one is over `max_size` or of unknown size.
pub async fn prepare_download(
    provider: &dyn StreamProvider,
    raw_url: &str,
    max_size: u64,
) -> AppResult<(ResolvedVideo, StreamDescriptor)> {
    let url = parse_video_url(raw_url)?;
    let video = provider.resolve(&url).await?;

    let stream = select_best_stream(&video.streams)
        .cloned()
        .ok_or(AppError::NoSuitableStream)?;

    if !stream.fits_within(max_size) {
        log::info!(
            "Rejecting {} format {}: size {:?} over limit {}",
            video.url,
            stream.format_id,
            stream.size_bytes,
            max_size
        );
        return Err(AppError::SizeExceeded {
            size: stream.size_bytes,
            limit: max_size,
        });
    }

    Ok((video, stream))
}
