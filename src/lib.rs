//! ytrelay - Telegram bot that searches YouTube and relays videos to the chat
//!
//! # Module Structure
//!
//! - `core`: configuration, errors and logging
//! - `search`: video search provider (YouTube Data API)
//! - `download`: stream resolution, selection and staging (yt-dlp)
//! - `telegram`: commands, keyboards, handler tree and webhook runner

pub mod core;
pub mod download;
pub mod search;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult, Config};
pub use download::{StreamProvider, YtDlpProvider};
pub use search::{VideoSearch, YouTubeSearch};
pub use telegram::{schema, HandlerDeps};
