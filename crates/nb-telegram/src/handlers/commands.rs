use teloxide::types::{MessageEntity, MessageEntityKind};

use nb_core::{
    domain::{ChatId, UserId},
    messaging::types::{Command, IncomingUpdate},
};

/// Where an incoming text message goes.
#[derive(Debug, PartialEq, Eq)]
pub(super) enum Route {
    Command,
    /// A command addressed to a different bot in a group chat.
    OtherBot,
    Note,
}

/// A message is a command only when Telegram marked a bot command at its start.
///
/// Anything else that merely begins with `/` (`/привет`, `/ note`) is note text.
pub(super) fn classify(
    text: &str,
    entities: &[MessageEntity],
    bot_username: Option<&str>,
) -> Route {
    let is_command = entities
        .iter()
        .any(|e| e.kind == MessageEntityKind::BotCommand && e.offset == 0);
    if !is_command {
        return Route::Note;
    }
    match (addressee(text), bot_username) {
        (Some(to), Some(me)) if !to.eq_ignore_ascii_case(me) => Route::OtherBot,
        _ => Route::Command,
    }
}

/// The `botname` of `/cmd@botname`, if present.
fn addressee(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    first.split_once('@').map(|(_, bot)| bot)
}

fn parse_command(text: &str) -> (String, String) {
    // Telegram may send `/cmd@botname arg1 ...`
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("")
        .to_lowercase();

    (cmd, rest)
}

pub(super) fn to_update(chat_id: ChatId, user_id: UserId, text: &str) -> IncomingUpdate {
    let (name, args) = parse_command(text);
    IncomingUpdate::Command(Command {
        chat_id,
        user_id,
        name,
        args,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_slash_and_bot_mention() {
        assert_eq!(
            parse_command("/delete@notes_bot 2"),
            ("delete".to_string(), "2".to_string())
        );
        assert_eq!(parse_command("/LIST"), ("list".to_string(), String::new()));
    }

    #[test]
    fn keeps_everything_after_the_command_as_args() {
        assert_eq!(
            parse_command("/search  buy   milk "),
            ("search".to_string(), "buy   milk".to_string())
        );
        assert_eq!(
            parse_command("/search\nmulti line"),
            ("search".to_string(), "multi line".to_string())
        );
    }

    fn command_entity(length: usize) -> Vec<MessageEntity> {
        vec![MessageEntity {
            kind: MessageEntityKind::BotCommand,
            offset: 0,
            length,
        }]
    }

    #[test]
    fn slash_text_without_command_entity_is_a_note() {
        for text in ["/привет мир", "/ заметка", "/", "//path/to/file"] {
            assert_eq!(classify(text, &[], Some("notes_bot")), Route::Note, "{text}");
        }
    }

    #[test]
    fn command_entity_must_start_the_message() {
        assert_eq!(
            classify("/list", &command_entity(5), Some("notes_bot")),
            Route::Command
        );

        let later = vec![MessageEntity {
            kind: MessageEntityKind::BotCommand,
            offset: 5,
            length: 5,
        }];
        assert_eq!(classify("see: /list", &later, Some("notes_bot")), Route::Note);
    }

    #[test]
    fn commands_for_other_bots_are_skipped() {
        assert_eq!(
            classify("/clear@other_bot", &command_entity(16), Some("notes_bot")),
            Route::OtherBot
        );
        assert_eq!(
            classify("/clear@Notes_Bot", &command_entity(16), Some("notes_bot")),
            Route::Command
        );
        assert_eq!(
            classify("/delete 2", &command_entity(7), Some("notes_bot")),
            Route::Command
        );
        // Without a known username every marked command is ours.
        assert_eq!(
            classify("/clear@other_bot", &command_entity(16), None),
            Route::Command
        );
    }

    #[test]
    fn builds_command_update() {
        let update = to_update(ChatId(1), UserId(2), "/delete 3");
        match update {
            IncomingUpdate::Command(c) => {
                assert_eq!(c.name, "delete");
                assert_eq!(c.args, "3");
                assert_eq!(c.user_id, UserId(2));
            }
            other => panic!("unexpected update: {other:?}"),
        }
    }
}
