//! Search result keyboard and selection payloads

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::core::error::{AppError, AppResult};
use crate::search::{SearchResultItem, MAX_RESULTS};

/// Prefix of every callback payload this bot issues
pub const SELECTION_PREFIX: &str = "video_";

/// Titles longer than this are cut in button labels
pub const LABEL_TITLE_CHARS: usize = 50;

pub const WATCH_URL_BASE: &str = "https://www.youtube.com/watch?v=";

/// `"{position}. {title}..."` with the title cut to [`LABEL_TITLE_CHARS`] characters.
///
/// The ellipsis is always appended, also for short titles.
pub fn button_label(item: &SearchResultItem) -> String {
    let title: String = item.title.chars().take(LABEL_TITLE_CHARS).collect();
    format!("{}. {}...", item.position, title)
}

pub fn selection_payload(video_id: &str) -> String {
    format!("{}{}", SELECTION_PREFIX, video_id)
}

/// One button per row, in result order
pub fn search_results_keyboard(items: &[SearchResultItem]) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = items
        .iter()
        .take(usize::from(MAX_RESULTS))
        .map(|item| vec![InlineKeyboardButton::callback(button_label(item), selection_payload(&item.id))])
        .collect();

    InlineKeyboardMarkup::new(rows)
}

/// Extracts the video id from a selection payload.
///
/// Everything after the prefix is the id, underscores included.
pub fn parse_selection(payload: &str) -> AppResult<&str> {
    match payload.strip_prefix(SELECTION_PREFIX) {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(AppError::UnrecognizedCallback(payload.to_string())),
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("{}{}", WATCH_URL_BASE, video_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use teloxide::types::InlineKeyboardButtonKind;

    fn item(position: usize, id: &str, title: &str) -> SearchResultItem {
        SearchResultItem {
            id: id.to_string(),
            title: title.to_string(),
            position,
        }
    }

    #[test]
    fn test_short_title_still_gets_ellipsis() {
        assert_eq!(button_label(&item(1, "abc", "Cat")), "1. Cat...");
    }

    #[test]
    fn test_long_title_truncated_to_50_chars() {
        let title = "x".repeat(80);
        let label = button_label(&item(3, "abc", &title));
        assert_eq!(label, format!("3. {}...", "x".repeat(50)));
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let title = "кот".repeat(20); // 60 chars, 120 bytes
        let label = button_label(&item(2, "abc", &title));
        assert_eq!(label, format!("2. {}...", "кот".repeat(20).chars().take(50).collect::<String>()));
    }

    #[test]
    fn test_keyboard_has_one_button_per_row() {
        let items: Vec<_> = (1..=12).map(|i| item(i, &format!("id{}", i), "t")).collect();
        let keyboard = search_results_keyboard(&items);

        assert_eq!(keyboard.inline_keyboard.len(), 10);
        assert!(keyboard.inline_keyboard.iter().all(|row| row.len() == 1));

        let first = &keyboard.inline_keyboard[0][0];
        assert_eq!(first.text, "1. t...");
        match &first.kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "video_id1"),
            other => panic!("unexpected button kind: {:?}", other),
        }
    }

    #[test]
    fn test_parse_selection() {
        assert_eq!(parse_selection("video_abc123").unwrap(), "abc123");
        assert_eq!(parse_selection("video_a_b-c").unwrap(), "a_b-c");
        assert!(matches!(parse_selection("video_"), Err(AppError::UnrecognizedCallback(_))));
        assert!(matches!(parse_selection("menu:main"), Err(AppError::UnrecognizedCallback(_))));
        assert!(matches!(parse_selection(""), Err(AppError::UnrecognizedCallback(_))));
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(watch_url("dQw4w9WgXcQ"), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }
}
