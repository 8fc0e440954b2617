//! Process configuration
//!
//! Everything is read once at startup into a single [`Config`] value which is
//! then shared read-only with every handler through `HandlerDeps`.
//!
//! Environment variables:
//! - `TELEGRAM_TOKEN` (required): bot token, also used as the webhook path
//! - `YOUTUBE_API_KEY` (required): YouTube Data API key
//! - `DOMAIN` (required): public domain the webhook is registered under
//! - `PORT`: listen port, default `8080`
//! - `REGION`: default `us-central1`, passed through
//! - `PROJECT_ID`: optional, passed through
//! - `MAX_VIDEO_SIZE`: attachment ceiling in bytes, default 50 MiB
//! - `YTDL_BIN`: yt-dlp binary, default `yt-dlp`
//! - `YTDLP_TIMEOUT_SECS`: per yt-dlp invocation, default 240
//! - `TEMP_FILES_DIR`: where downloads are staged, default OS temp dir
//! - `YOUTUBE_API_URL`: search API base, default Google's v3 endpoint
//! - `BOT_API_URL`: custom Telegram Bot API server
//! - `LOG_FILE_PATH`: optional log file in addition to the terminal

use secrecy::{ExposeSecret, SecretString};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

pub const TELEGRAM_TOKEN_KEY: &str = "TELEGRAM_TOKEN";
pub const YOUTUBE_API_KEY: &str = "YOUTUBE_API_KEY";
pub const PORT_KEY: &str = "PORT";
pub const DOMAIN_KEY: &str = "DOMAIN";
pub const REGION_KEY: &str = "REGION";
pub const PROJECT_ID_KEY: &str = "PROJECT_ID";
pub const MAX_VIDEO_SIZE_KEY: &str = "MAX_VIDEO_SIZE";
pub const YTDL_BIN_KEY: &str = "YTDL_BIN";
pub const YTDLP_TIMEOUT_KEY: &str = "YTDLP_TIMEOUT_SECS";
pub const TEMP_FILES_DIR_KEY: &str = "TEMP_FILES_DIR";
pub const YOUTUBE_API_URL_KEY: &str = "YOUTUBE_API_URL";
pub const BOT_API_URL_KEY: &str = "BOT_API_URL";
pub const LOG_FILE_PATH_KEY: &str = "LOG_FILE_PATH";

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REGION: &str = "us-central1";
pub const DEFAULT_YTDL_BIN: &str = "yt-dlp";
pub const DEFAULT_YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Telegram Bot API limit for bot uploads (50 MiB)
pub const MAX_VIDEO_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// yt-dlp command timeout (in seconds)
pub const YTDLP_TIMEOUT_SECS: u64 = 240; // 4 minutes, metadata fetches can be slow

/// Search API request timeout (in seconds)
pub const SEARCH_TIMEOUT_SECS: u64 = 15;

/// Request timeout for Telegram uploads (in seconds)
pub const TELEGRAM_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    #[error("{key} has an invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Immutable process configuration
#[derive(Debug)]
pub struct Config {
    pub bot_token: SecretString,
    pub youtube_api_key: SecretString,
    pub port: u16,
    pub domain: String,
    pub region: String,
    pub project_id: Option<String>,
    pub max_video_size: u64,
    pub ytdl_bin: String,
    pub ytdlp_timeout: Duration,
    pub temp_dir: PathBuf,
    pub youtube_api_url: Url,
    pub bot_api_url: Option<Url>,
    pub log_file_path: Option<PathBuf>,
}

impl Config {
    /// Loads `.env` and then `.secret` (which overrides) before reading the
    /// process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(e) = dotenvy::from_filename(".env") {
            log::debug!(".env not loaded: {}", e);
        }
        if let Err(e) = dotenvy::from_filename_override(".secret") {
            log::debug!(".secret not loaded: {}", e);
        }
        Self::from_env()
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Values are trimmed; a blank value counts as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let bot_token = SecretString::from(required(TELEGRAM_TOKEN_KEY)?);
        let youtube_api_key = SecretString::from(required(YOUTUBE_API_KEY)?);
        let domain = required(DOMAIN_KEY)?;

        let port = parse_or(get(PORT_KEY), PORT_KEY, DEFAULT_PORT)?;
        let max_video_size = parse_or(get(MAX_VIDEO_SIZE_KEY), MAX_VIDEO_SIZE_KEY, MAX_VIDEO_SIZE_BYTES)?;
        // A zero ceiling would reject every video
        if max_video_size == 0 {
            return Err(ConfigError::Invalid {
                key: MAX_VIDEO_SIZE_KEY,
                value: "0".to_string(),
            });
        }
        let ytdlp_timeout = Duration::from_secs(parse_or(get(YTDLP_TIMEOUT_KEY), YTDLP_TIMEOUT_KEY, YTDLP_TIMEOUT_SECS)?);

        let youtube_api_url = parse_url(
            get(YOUTUBE_API_URL_KEY).unwrap_or_else(|| DEFAULT_YOUTUBE_API_URL.to_string()),
            YOUTUBE_API_URL_KEY,
        )?;
        let bot_api_url = get(BOT_API_URL_KEY)
            .map(|raw| parse_url(raw, BOT_API_URL_KEY))
            .transpose()?;

        Ok(Self {
            bot_token,
            youtube_api_key,
            port,
            domain,
            region: get(REGION_KEY).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            project_id: get(PROJECT_ID_KEY),
            max_video_size,
            ytdl_bin: get(YTDL_BIN_KEY).unwrap_or_else(|| DEFAULT_YTDL_BIN.to_string()),
            ytdlp_timeout,
            temp_dir: get(TEMP_FILES_DIR_KEY)
                .map(PathBuf::from)
                .unwrap_or_else(std::env::temp_dir),
            youtube_api_url,
            bot_api_url,
            log_file_path: get(LOG_FILE_PATH_KEY).map(PathBuf::from),
        })
    }

    /// Public URL Telegram delivers updates to: `https://<domain>/<token>`
    pub fn webhook_url(&self) -> Result<Url, ConfigError> {
        let raw = format!("https://{}/{}", self.domain, self.bot_token.expose_secret());
        Url::parse(&raw).map_err(|_| ConfigError::Invalid {
            key: DOMAIN_KEY,
            value: self.domain.clone(),
        })
    }

    /// Ceiling rendered for users, e.g. `50MB`
    pub fn max_video_size_label(&self) -> String {
        format_size(self.max_video_size)
    }

    /// Logs the effective configuration with secrets masked
    pub fn log_summary(&self) {
        log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        log::info!("{}: {}", TELEGRAM_TOKEN_KEY, mask(self.bot_token.expose_secret()));
        log::info!("{}: {}", YOUTUBE_API_KEY, mask(self.youtube_api_key.expose_secret()));
        log::info!("{}: {}", DOMAIN_KEY, self.domain);
        log::info!("{}: {}", PORT_KEY, self.port);
        log::info!("{}: {}", REGION_KEY, self.region);
        if let Some(ref project_id) = self.project_id {
            log::info!("{}: {}", PROJECT_ID_KEY, project_id);
        }
        log::info!("{}: {} bytes", MAX_VIDEO_SIZE_KEY, self.max_video_size);
        log::info!("{}: {}", YTDL_BIN_KEY, self.ytdl_bin);
        log::info!("{}: {}", TEMP_FILES_DIR_KEY, self.temp_dir.display());
        if let Some(ref url) = self.bot_api_url {
            log::info!("{}: {}", BOT_API_URL_KEY, url);
        }
        log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_url(raw: String, key: &'static str) -> Result<Url, ConfigError> {
    Url::parse(&raw).map_err(|_| ConfigError::Invalid { key, value: raw })
}

/// Whole units print without decimals (`50MB`), anything else with one (`1.5MB`).
/// Sizes under a MiB fall back to KB, under a KiB to bytes.
fn format_size(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;

    let (unit, name) = match bytes {
        b if b >= MIB => (MIB, "MB"),
        b if b >= KIB => (KIB, "KB"),
        _ => return format!("{}B", bytes),
    };

    if bytes % unit == 0 {
        format!("{}{}", bytes / unit, name)
    } else {
        format!("{:.1}{}", bytes as f64 / unit as f64, name)
    }
}

/// Keeps the first four characters of a secret
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}***", visible)
}
