//! Webhook listener and dispatcher loop

use std::net::SocketAddr;

use teloxide::prelude::*;
use teloxide::update_listeners::webhooks;

use super::handlers::{schema, HandlerDeps};

/// Serves updates posted to `https://<domain>/<token>` until Ctrl-C.
///
/// The listener registers the webhook with Telegram on start and removes it
/// again on shutdown.
pub async fn run_webhook(bot: Bot, deps: HandlerDeps) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], deps.config.port));
    let url = deps.config.webhook_url()?;

    // The URL path is the bot token, keep it out of the log
    log::info!("Starting webhook listener on {} for https://{}/<token>", addr, deps.config.domain);

    let listener = webhooks::axum(bot.clone(), webhooks::Options::new(addr, url)).await?;

    Dispatcher::builder(bot, schema(deps))
        .enable_ctrlc_handler()
        .build()
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("An error from the update listener"),
        )
        .await;

    log::info!("Dispatcher stopped");
    Ok(())
}
