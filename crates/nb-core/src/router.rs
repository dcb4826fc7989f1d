//! Maps incoming updates (commands, plain text, button presses) to note operations.

use std::sync::Arc;

use tracing::debug;

use crate::{
    domain::UserId,
    errors::{Error, InvalidPosition},
    formatting,
    messaging::types::{IncomingUpdate, Keyboard, Reply},
    notes::{normalize_query, parse_position, NoteStore},
    Result,
};

/// Slash commands the bot understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Menu,
    List,
    ListButtons,
    Delete,
    Clear,
    Search,
}

impl BotCommand {
    /// `name` is already lower-cased and stripped of `/` and `@botname`.
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "start" => Self::Start,
            "help" => Self::Help,
            "menu" => Self::Menu,
            "list" => Self::List,
            "list_buttons" => Self::ListButtons,
            "delete" => Self::Delete,
            "clear" => Self::Clear,
            "search" => Self::Search,
            _ => return None,
        })
    }
}

/// Payloads carried by the `/menu` inline buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallbackAction {
    ListNotes,
    ClearNotes,
    Help,
}

impl CallbackAction {
    pub fn parse(data: &str) -> Option<Self> {
        match data {
            "list_notes" => Some(Self::ListNotes),
            "clear_notes" => Some(Self::ClearNotes),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

/// Routes every entry point through one `NoteStore`, scoped to the sender.
#[derive(Clone)]
pub struct CommandRouter {
    store: Arc<dyn NoteStore>,
}

impl CommandRouter {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    /// Handle one update. `Ok(None)` means there is nothing to say (unknown command or payload).
    ///
    /// Bad `/delete` and `/search` arguments become guidance replies; storage errors are returned.
    pub async fn handle(&self, update: &IncomingUpdate) -> Result<Option<Reply>> {
        let user_id = update.user_id();
        match update {
            IncomingUpdate::Text(msg) => self.save_note(user_id, &msg.text).await.map(Some),
            IncomingUpdate::Command(cmd) => {
                let Some(command) = BotCommand::parse(&cmd.name) else {
                    debug!(command = %cmd.name, "ignoring unknown command");
                    return Ok(None);
                };
                self.run_command(user_id, command, &cmd.args).await.map(Some)
            }
            IncomingUpdate::Callback(q) => {
                let Some(action) = CallbackAction::parse(&q.data) else {
                    debug!(data = %q.data, "ignoring unknown callback payload");
                    return Ok(None);
                };
                self.run_callback(user_id, action).await.map(Some)
            }
        }
    }

    async fn run_command(&self, user_id: UserId, command: BotCommand, args: &str) -> Result<Reply> {
        match command {
            BotCommand::Start => Ok(Reply::text(formatting::WELCOME)
                .with_keyboard(Keyboard::Reply(formatting::start_keyboard()))),
            BotCommand::Help => Ok(Reply::text(formatting::HELP)),
            // `/list_buttons` has no per-note buttons; it shows the action menu.
            BotCommand::Menu | BotCommand::ListButtons => Ok(Reply::text(formatting::MENU_PROMPT)
                .with_keyboard(Keyboard::Inline(formatting::menu_keyboard()))),
            BotCommand::List => {
                let notes = self.store.list(user_id).await?;
                Ok(Reply::text(
                    formatting::format_note_list(&notes)
                        .unwrap_or_else(|| formatting::NO_NOTES.to_string()),
                ))
            }
            BotCommand::Delete => self.delete_note(user_id, args).await,
            BotCommand::Clear => {
                self.store.clear(user_id).await?;
                Ok(Reply::text(formatting::ALL_DELETED))
            }
            BotCommand::Search => self.search_notes(user_id, args).await,
        }
    }

    async fn run_callback(&self, user_id: UserId, action: CallbackAction) -> Result<Reply> {
        let reply = match action {
            CallbackAction::ListNotes => {
                let notes = self.store.list(user_id).await?;
                Reply::text(formatting::menu_listing(&notes))
            }
            CallbackAction::ClearNotes => {
                self.store.clear(user_id).await?;
                Reply::text(formatting::ALL_CLEARED)
            }
            CallbackAction::Help => Reply::text(formatting::HELP),
        };
        Ok(reply.editing_source())
    }

    async fn save_note(&self, user_id: UserId, text: &str) -> Result<Reply> {
        let count = self.store.add(user_id, text).await?;
        Ok(Reply::text(formatting::note_saved(count)))
    }

    async fn delete_note(&self, user_id: UserId, args: &str) -> Result<Reply> {
        let deleted = match parse_position(args) {
            Ok(position) => self.store.delete_at(user_id, position).await,
            Err(e) => Err(e),
        };
        match deleted {
            Ok(text) => Ok(Reply::text(formatting::note_deleted(&text))),
            Err(Error::InvalidPosition(InvalidPosition::OutOfRange { .. })) => {
                Ok(Reply::text(formatting::INVALID_POSITION))
            }
            Err(Error::InvalidPosition(_)) => Ok(Reply::text(formatting::POSITION_USAGE)),
            Err(e) => Err(e),
        }
    }

    async fn search_notes(&self, user_id: UserId, args: &str) -> Result<Reply> {
        let query = normalize_query(args);
        match self.store.search(user_id, &query).await {
            Ok(found) => Ok(Reply::text(formatting::search_results(&found))),
            Err(Error::EmptyQuery) => Ok(Reply::text(formatting::SEARCH_USAGE)),
            Err(e) => Err(e),
        }
    }
}
