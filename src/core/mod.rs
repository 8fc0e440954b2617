//! Core utilities: configuration, errors and logging

pub mod config;
pub mod error;
pub mod logging;

// Re-exports for convenience
pub use config::{Config, ConfigError};
pub use error::{AppError, AppResult, ArgumentKind};
pub use logging::{init_logger, install_panic_hook};
