use std::fmt;

use super::ytdlp_errors::YtDlpErrorType;

/// Structured error type for stream resolution and transfer.
#[derive(Debug)]
pub enum DownloadError {
    /// User-supplied URL could not be parsed or is not http(s)
    InvalidUrl(String),
    /// yt-dlp exited with an error; carries the analysed category and stderr
    YtDlp(String),
    /// yt-dlp could not be started or waited on
    Process(String),
    /// yt-dlp did not finish within the configured timeout
    Timeout(String),
    /// `--dump-json` output could not be decoded
    Parse(String),
    /// Expected file not found after the transfer
    FileNotFound(String),
    /// Staging directory / file errors
    Io(std::io::Error),
}

impl fmt::Display for DownloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DownloadError::InvalidUrl(url) => write!(f, "invalid URL: {}", url),
            DownloadError::YtDlp(msg) => write!(f, "{}", msg),
            DownloadError::Process(msg) => write!(f, "{}", msg),
            DownloadError::Timeout(msg) => write!(f, "{}", msg),
            DownloadError::Parse(msg) => write!(f, "{}", msg),
            DownloadError::FileNotFound(msg) => write!(f, "{}", msg),
            DownloadError::Io(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DownloadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DownloadError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl DownloadError {
    /// Builds a yt-dlp failure from its stderr, tagging the detected category
    pub fn from_ytdlp_stderr(stderr: &str) -> Self {
        let error_type = YtDlpErrorType::analyze(stderr);
        DownloadError::YtDlp(format!("[{}] {}", error_type.as_str(), stderr.trim()))
    }

    /// Returns subcategory for logs
    pub fn subcategory(&self) -> &'static str {
        match self {
            DownloadError::InvalidUrl(_) => "invalid_url",
            DownloadError::YtDlp(_) => "ytdlp",
            DownloadError::Process(_) => "process",
            DownloadError::Timeout(_) => "timeout",
            DownloadError::Parse(_) => "parse",
            DownloadError::FileNotFound(_) => "file_not_found",
            DownloadError::Io(_) => "io",
        }
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(err: std::io::Error) -> Self {
        DownloadError::Io(err)
    }
}

impl From<serde_json::Error> for DownloadError {
    fn from(err: serde_json::Error) -> Self {
        DownloadError::Parse(err.to_string())
    }
}
