//! Command handlers: /start, /search and /download

use indoc::indoc;
use teloxide::prelude::*;
use teloxide::types::{InputFile, Message};
use teloxide::RequestError;

use super::types::HandlerDeps;
use crate::core::error::{AppError, AppResult, ArgumentKind};
use crate::download::{prepare_download, stage_and_forward};
use crate::search::run_search;
use crate::telegram::keyboard::search_results_keyboard;

pub const WELCOME_TEXT: &str = indoc! {"
    Welcome! I can help you search and download YouTube videos.
    Use /search <query> to search for videos
    Use /download <url> to download a video"};

pub const RESULTS_HEADER: &str = "Here are the top 10 results. Click on a video to get its link:";
pub const DOWNLOADING_TEXT: &str = "Downloading video...";

pub(super) async fn handle_start_command(bot: &Bot, msg: &Message) -> Result<(), RequestError> {
    bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
    Ok(())
}

pub(super) async fn handle_search_command(
    bot: &Bot,
    msg: &Message,
    query: &str,
    deps: &HandlerDeps,
) -> Result<(), RequestError> {
    match run_search(deps.search.as_ref(), query).await {
        Ok(items) => {
            bot.send_message(msg.chat.id, RESULTS_HEADER)
                .reply_markup(search_results_keyboard(&items))
                .await?;
            Ok(())
        }
        Err(e) => reply_with_error(bot, msg.chat.id, &e, deps).await,
    }
}

/// Resolves the URL, checks the size ceiling, then stages the file and sends
/// it as a video. Only the first whitespace-separated token is used as URL.
pub(super) async fn handle_download_command(
    bot: &Bot,
    msg: &Message,
    args: &str,
    deps: &HandlerDeps,
) -> Result<(), RequestError> {
    match download_and_send(bot, msg.chat.id, args, deps).await {
        Ok(()) => Ok(()),
        Err(e) => reply_with_error(bot, msg.chat.id, &e, deps).await,
    }
}

async fn download_and_send(bot: &Bot, chat_id: ChatId, args: &str, deps: &HandlerDeps) -> AppResult<()> {
    let raw_url = args
        .split_whitespace()
        .next()
        .ok_or(AppError::MissingArgument(ArgumentKind::Url))?;

    let config = &deps.config;
    let (video, stream) = prepare_download(deps.streams.as_ref(), raw_url, config.max_video_size).await?;

    bot.send_message(chat_id, DOWNLOADING_TEXT).await?;

    let caption = format!("Here's your video: {}", video.title);
    stage_and_forward(
        deps.streams.as_ref(),
        &video,
        &stream,
        &config.temp_dir,
        |path| async move {
            bot.send_video(chat_id, InputFile::file(path)).caption(caption).await?;
            Ok::<(), AppError>(())
        },
    )
    .await?;

    log::info!("Sent \"{}\" ({}) to chat {}", video.title, video.url, chat_id);
    Ok(())
}

/// Logs the outcome and sends its user-facing text, if any.
async fn reply_with_error(bot: &Bot, chat_id: ChatId, err: &AppError, deps: &HandlerDeps) -> Result<(), RequestError> {
    if err.is_failure() {
        log::error!("Request from chat {} failed [{}]: {}", chat_id, err.log_tag(), err);
    } else {
        log::info!("Request from chat {} ended without content [{}]: {}", chat_id, err.log_tag(), err);
    }

    if let Some(text) = err.user_message(&deps.config.max_video_size_label()) {
        bot.send_message(chat_id, text).await?;
    }
    Ok(())
}
