use anyhow::Result;
use std::sync::Arc;

use ytrelay::core::{init_logger, install_panic_hook, Config};
use ytrelay::download::YtDlpProvider;
use ytrelay::search::YouTubeSearch;
use ytrelay::telegram::{create_bot, run_webhook, setup_bot_commands, HandlerDeps};

/// Main entry point for the Telegram bot
///
/// # Errors
/// Returns an error if initialization fails (configuration, logging, bot
/// creation or webhook setup).
#[tokio::main]
async fn main() -> Result<()> {
    install_panic_hook();

    // Missing required variables stop the process before anything is served
    let config = Config::load()?;

    init_logger(config.log_file_path.as_deref())?;
    log::info!("Starting ytrelay...");
    config.log_summary();

    let bot = create_bot(&config)?;

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to register bot commands: {}", e);
    }

    let search = YouTubeSearch::from_config(&config)?;
    let streams = YtDlpProvider::from_config(&config);
    let deps = HandlerDeps::new(Arc::new(config), Arc::new(search), Arc::new(streams));

    run_webhook(bot, deps).await
}
