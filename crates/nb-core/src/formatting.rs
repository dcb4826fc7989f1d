//! Reply texts and keyboards.

use crate::{
    messaging::types::{InlineButton, InlineKeyboard, ReplyKeyboard},
    notes::ListedNote,
};

pub const NO_NOTES: &str = "Заметок пока нет.";
pub const NO_MATCHES: &str = "Нет совпадений.";
pub const INVALID_POSITION: &str = "Неверный номер заметки.";
pub const POSITION_USAGE: &str =
    "Пожалуйста, укажите номер заметки для удаления. Например: /delete 1";
pub const SEARCH_USAGE: &str =
    "Пожалуйста, укажите текст для поиска. Например: /search ключевое_слово";
pub const ALL_DELETED: &str = "Все заметки удалены!";
pub const ALL_CLEARED: &str = "Все заметки очищены!";
pub const MENU_PROMPT: &str = "Выберите действие:";
pub const WELCOME: &str =
    "Привет! Я твой бот для заметок. Вот список доступных команд. Выберите одну из кнопок ниже:";

pub const HELP: &str = "📚 Доступные команды:

/start - Начать работу с ботом
/menu - Показать меню действий
/list - Показать все заметки
/list_buttons - Показать заметки с кнопками удаления
/delete [номер] - Удалить конкретную заметку (пример: /delete 1)
/clear - Удалить все заметки
/search [текст] - Поиск заметок (пример: /search покупки)
/help - Показать это сообщение

💡 Как использовать:
Просто отправляйте мне текст, и я сохраню его как заметку!";

/// Numbered listing, one `"{index}. {text}"` entry per note, separated by blank lines.
///
/// `None` when there is nothing to show, so callers pick their own empty message.
pub fn format_note_list(notes: &[ListedNote]) -> Option<String> {
    if notes.is_empty() {
        return None;
    }
    Some(
        notes
            .iter()
            .map(|n| format!("{}. {}", n.index, n.text))
            .collect::<Vec<_>>()
            .join("\n\n"),
    )
}

pub fn note_saved(count: usize) -> String {
    format!("Заметка сохранена! Сейчас у тебя {count} заметок.")
}

pub fn note_deleted(text: &str) -> String {
    format!("Заметка удалена: {text}")
}

pub fn search_results(notes: &[ListedNote]) -> String {
    match format_note_list(notes) {
        Some(listing) => format!("Найдено:\n\n{listing}"),
        None => NO_MATCHES.to_string(),
    }
}

/// Listing shown when the menu's "list" button is pressed.
pub fn menu_listing(notes: &[ListedNote]) -> String {
    match format_note_list(notes) {
        Some(listing) => format!("Список заметок:\n\n{listing}"),
        None => NO_NOTES.to_string(),
    }
}

/// Keyboard shown by `/start`.
pub fn start_keyboard() -> ReplyKeyboard {
    let row = |a: &str, b: &str| vec![a.to_string(), b.to_string()];
    ReplyKeyboard {
        rows: vec![
            row("/list", "/list_buttons"),
            row("/delete", "/clear"),
            row("/search", "/help"),
        ],
    }
}

/// Inline action menu shown by `/menu`. Payloads are parsed by `router::CallbackAction`.
pub fn menu_keyboard() -> InlineKeyboard {
    let button = |label: &str, data: &str| InlineButton {
        label: label.to_string(),
        callback_data: data.to_string(),
    };
    InlineKeyboard::new(vec![
        button("Список заметок", "list_notes"),
        button("Очистить заметки", "clear_notes"),
        button("Помощь", "help"),
    ])
}

/// Split an outgoing message into chunks of at most `limit` bytes.
///
/// Prefers note boundaries (blank lines), then line breaks, then any char boundary.
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.len() <= limit {
        return vec![text.to_string()];
    }

    let mut out = Vec::new();
    let mut rest = text;
    while rest.len() > limit {
        let window = &rest[..floor_char_boundary(rest, limit)];
        let cut = window
            .rfind("\n\n")
            .filter(|&i| i > 0)
            .or_else(|| window.rfind('\n').filter(|&i| i > 0))
            .unwrap_or(window.len());
        out.push(rest[..cut].to_string());
        rest = rest[cut..].trim_start_matches('\n');
    }
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

fn floor_char_boundary(s: &str, max_bytes: usize) -> usize {
    let mut idx = max_bytes.min(s.len());
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    if idx == 0 {
        // A single char wider than the limit; emit it whole to make progress.
        return s.chars().next().map_or(0, char::len_utf8);
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(items: &[(usize, &str)]) -> Vec<ListedNote> {
        items
            .iter()
            .map(|(index, text)| ListedNote {
                index: *index,
                text: text.to_string(),
            })
            .collect()
    }

    #[test]
    fn empty_listing_is_none() {
        assert_eq!(format_note_list(&[]), None);
        assert_eq!(menu_listing(&[]), NO_NOTES);
        assert_eq!(search_results(&[]), NO_MATCHES);
    }

    #[test]
    fn listing_joins_with_blank_lines() {
        let notes = listed(&[(1, "buy milk"), (2, "call mom")]);
        assert_eq!(
            format_note_list(&notes).unwrap(),
            "1. buy milk\n\n2. call mom"
        );
        assert_eq!(
            menu_listing(&notes),
            "Список заметок:\n\n1. buy milk\n\n2. call mom"
        );
    }

    #[test]
    fn search_results_keep_original_indices() {
        let notes = listed(&[(2, "call mom")]);
        assert_eq!(search_results(&notes), "Найдено:\n\n2. call mom");
    }

    #[test]
    fn menu_payloads_are_stable() {
        let data: Vec<_> = menu_keyboard()
            .buttons
            .into_iter()
            .map(|b| b.callback_data)
            .collect();
        assert_eq!(data, vec!["list_notes", "clear_notes", "help"]);
        assert_eq!(start_keyboard().rows.len(), 3);
    }

    #[test]
    fn short_messages_are_not_split() {
        assert_eq!(split_message("hello", 10), vec!["hello"]);
    }

    #[test]
    fn splits_on_note_boundaries() {
        let text = "1. aaaa\n\n2. bbbb\n\n3. cccc";
        let chunks = split_message(text, 18);
        assert_eq!(chunks, vec!["1. aaaa\n\n2. bbbb", "3. cccc"]);
    }

    #[test]
    fn falls_back_to_line_then_char_boundaries() {
        assert_eq!(split_message("aaaa\nbbbb", 6), vec!["aaaa", "bbbb"]);
        assert_eq!(split_message("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn never_splits_inside_a_char() {
        let text = "жжжж"; // 2 bytes each
        let chunks = split_message(text, 3);
        assert_eq!(chunks, vec!["ж", "ж", "ж", "ж"]);
        assert!(chunks.iter().all(|c| c.len() <= 3));
    }
}
