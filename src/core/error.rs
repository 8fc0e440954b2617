use thiserror::Error;

use crate::download::error::DownloadError;
use crate::search::SearchError;

/// The argument a command could not run without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    Query,
    Url,
}

/// Centralized error types for the handlers
///
/// Each handler boils its outcome down to this enum. Expected empty outcomes
/// (`NoResults`, `NoSuitableStream`) and policy rejections (`SizeExceeded`) are
/// kept apart from real provider failures so that the user sees a specific
/// message for the former and only a generic one for the latter.
#[derive(Error, Debug)]
pub enum AppError {
    /// Command was sent without its argument
    #[error("Missing argument: {0:?}")]
    MissingArgument(ArgumentKind),

    /// Search API failure (auth, quota, transport, bad payload)
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Stream resolution or transfer failure
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),

    /// Search returned zero items
    #[error("No results")]
    NoResults,

    /// No progressive MP4 stream available
    #[error("No suitable stream")]
    NoSuitableStream,

    /// Best stream is over the attachment ceiling (or its size is unknown)
    #[error("Stream size {size:?} exceeds limit of {limit} bytes")]
    SizeExceeded { size: Option<u64>, limit: u64 },

    /// Callback payload that this bot did not issue
    #[error("Unrecognized callback payload: {0}")]
    UnrecognizedCallback(String),

    /// Telegram API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

pub const SEARCH_USAGE: &str = "Please provide a search query.";
pub const DOWNLOAD_USAGE: &str = "Please provide a YouTube URL.";
pub const NO_RESULTS: &str = "No videos found.";
pub const SEARCH_FAILED: &str = "Sorry, there was an error searching YouTube.";
pub const NO_SUITABLE_STREAM: &str = "No suitable video stream found.";
pub const DOWNLOAD_FAILED: &str = "Sorry, there was an error downloading the video.";

impl AppError {
    /// Text shown to the user, or `None` when the event is dropped silently.
    ///
    /// `size_label` is the configured ceiling as rendered for users (`50MB`).
    pub fn user_message(&self, size_label: &str) -> Option<String> {
        let text = match self {
            AppError::MissingArgument(ArgumentKind::Query) => SEARCH_USAGE.to_string(),
            AppError::MissingArgument(ArgumentKind::Url) => DOWNLOAD_USAGE.to_string(),
            AppError::NoResults => NO_RESULTS.to_string(),
            AppError::Search(_) => SEARCH_FAILED.to_string(),
            AppError::NoSuitableStream => NO_SUITABLE_STREAM.to_string(),
            AppError::SizeExceeded { .. } => size_rejection_message(size_label),
            AppError::Download(_) | AppError::Telegram(_) | AppError::Io(_) => DOWNLOAD_FAILED.to_string(),
            AppError::UnrecognizedCallback(_) => return None,
        };
        Some(text)
    }

    /// Short category for the error log, e.g. `download/timeout`.
    pub fn log_tag(&self) -> String {
        match self {
            AppError::Download(e) => format!("download/{}", e.subcategory()),
            AppError::Search(SearchError::Status { status, .. }) => format!("search/status_{}", status),
            AppError::Search(_) => "search/transport".to_string(),
            AppError::Telegram(_) => "telegram".to_string(),
            AppError::Io(_) => "io".to_string(),
            AppError::MissingArgument(_) => "missing_argument".to_string(),
            AppError::NoResults => "no_results".to_string(),
            AppError::NoSuitableStream => "no_suitable_stream".to_string(),
            AppError::SizeExceeded { .. } => "size_exceeded".to_string(),
            AppError::UnrecognizedCallback(_) => "unrecognized_callback".to_string(),
        }
    }

    /// Whether operators should see this in the error log.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            AppError::Search(_) | AppError::Download(_) | AppError::Telegram(_) | AppError::Io(_)
        )
    }
}

pub fn size_rejection_message(size_label: &str) -> String {
    format!(
        "Sorry, this video is too large to send through Telegram (max {}).",
        size_label
    )
}
