//! Keyboard selection callbacks

use teloxide::prelude::*;
use teloxide::RequestError;

use crate::telegram::keyboard::{parse_selection, watch_url};

/// Answers every callback query, then replies with the watch URL when the
/// payload is one of ours. Foreign payloads get no reply.
pub(super) async fn handle_selection_callback(bot: &Bot, q: &CallbackQuery) -> Result<(), RequestError> {
    // Clears the loading state on the button even if the payload is not ours
    if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
        log::warn!("Failed to answer callback query {:?}: {}", q.id, e);
    }

    let payload = q.data.as_deref().unwrap_or_default();
    let video_id = match parse_selection(payload) {
        Ok(id) => id,
        Err(e) => {
            log::debug!("Ignoring callback from user {}: {}", q.from.id, e);
            return Ok(());
        }
    };

    let Some(message) = q.message.as_ref() else {
        log::warn!("Selection {} has no originating message, cannot reply", video_id);
        return Ok(());
    };

    log::info!("User {} selected video {}", q.from.id, video_id);
    bot.send_message(message.chat().id, watch_url(video_id)).await?;
    Ok(())
}
