use nb_core::{
    domain::{ChatId, UserId},
    messaging::types::{IncomingUpdate, TextMessage},
};

/// Plain text is always a new note, stored exactly as received.
pub(super) fn to_update(chat_id: ChatId, user_id: UserId, text: &str) -> IncomingUpdate {
    IncomingUpdate::Text(TextMessage {
        chat_id,
        user_id,
        text: text.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_not_trimmed() {
        match to_update(ChatId(1), UserId(1), "  spaced  ") {
            IncomingUpdate::Text(t) => assert_eq!(t.text, "  spaced  "),
            other => panic!("unexpected update: {other:?}"),
        }
    }
}
