//! Classification of yt-dlp failures.
//!
//! Users always get the same generic download error; the category only ends
//! up in the operator log so that cookie/bot-detection trouble stands out from
//! ordinary unavailable videos.

/// Types of yt-dlp errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YtDlpErrorType {
    /// Cookies are required, invalid or rotated
    InvalidCookies,
    /// YouTube flagged the request as automated
    BotDetection,
    /// Private, removed or region-locked video
    VideoUnavailable,
    /// Timeouts, DNS, connection resets
    NetworkError,
    /// URL yt-dlp cannot handle at all
    UnsupportedUrl,
    Unknown,
}

impl YtDlpErrorType {
    /// Detects the error type from yt-dlp's stderr
    pub fn analyze(stderr: &str) -> Self {
        let stderr_lower = stderr.to_lowercase();

        if stderr_lower.contains("cookies are no longer valid")
            || stderr_lower.contains("cookies have likely been rotated")
            || stderr_lower.contains("use --cookies-from-browser")
            || stderr_lower.contains("use --cookies for the authentication")
        {
            return YtDlpErrorType::InvalidCookies;
        }

        if stderr_lower.contains("sign in to confirm you're not a bot")
            || stderr_lower.contains("http error 403")
            || stderr_lower.contains("signature extraction failed")
        {
            return YtDlpErrorType::BotDetection;
        }

        if stderr_lower.contains("private video")
            || stderr_lower.contains("video unavailable")
            || stderr_lower.contains("this video is not available")
            || stderr_lower.contains("video has been removed")
            || stderr_lower.contains("this video does not exist")
        {
            return YtDlpErrorType::VideoUnavailable;
        }

        if stderr_lower.contains("unsupported url") || stderr_lower.contains("is not a valid url") {
            return YtDlpErrorType::UnsupportedUrl;
        }

        if stderr_lower.contains("timed out")
            || stderr_lower.contains("connection")
            || stderr_lower.contains("network")
            || stderr_lower.contains("dns")
            || stderr_lower.contains("failed to connect")
        {
            return YtDlpErrorType::NetworkError;
        }

        YtDlpErrorType::Unknown
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            YtDlpErrorType::InvalidCookies => "invalid_cookies",
            YtDlpErrorType::BotDetection => "bot_detection",
            YtDlpErrorType::VideoUnavailable => "video_unavailable",
            YtDlpErrorType::NetworkError => "network",
            YtDlpErrorType::UnsupportedUrl => "unsupported_url",
            YtDlpErrorType::Unknown => "unknown",
        }
    }
}
