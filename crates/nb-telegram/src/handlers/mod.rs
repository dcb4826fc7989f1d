//! Telegram update handlers.
//!
//! Each handler is a small adapter that:
//! - checks the sender against the allow-list
//! - turns the teloxide update into a core `IncomingUpdate`
//! - runs it through the `CommandRouter` and delivers the reply

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{CallbackQuery, Message},
};
use tracing::{debug, error, warn};

use nb_core::{
    domain::{ChatId, MessageRef, UserId},
    messaging::{delivery::deliver, types::IncomingUpdate},
    security::is_authorized,
};

use crate::router::AppState;
use commands::Route;

mod callback;
mod commands;
mod text;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    callback::handle_callback(q, state).await
}

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);
    let user_id = msg.from().map(|u| UserId(u.id.0 as i64));

    // Photos, stickers, etc. carry no note text.
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if !is_authorized(user_id, &state.cfg.telegram_allowed_users) {
        warn!(chat_id = chat_id.0, user_id = ?user_id, "unauthorized message");
        if let Err(e) = state
            .messenger
            .send_text(chat_id, "Unauthorized.", None)
            .await
        {
            warn!("failed to send unauthorized notice: {e}");
        }
        return Ok(());
    }
    let Some(user_id) = user_id else {
        return Ok(());
    };

    let entities = msg.entities().unwrap_or(&[]);
    let update = match commands::classify(text, entities, state.bot_username.as_deref()) {
        Route::Command => commands::to_update(chat_id, user_id, text),
        Route::Note => text::to_update(chat_id, user_id, text),
        Route::OtherBot => {
            debug!(chat_id = chat_id.0, "ignoring command addressed to another bot");
            return Ok(());
        }
    };

    route_and_reply(&state, update, None).await;
    Ok(())
}

/// Run an update through the router and deliver the reply.
///
/// Storage failures are logged, not shown to the user.
pub(crate) async fn route_and_reply(
    state: &AppState,
    update: IncomingUpdate,
    source: Option<MessageRef>,
) {
    let chat_id = update.chat_id();
    debug!(chat_id = chat_id.0, user_id = update.user_id().0, ?update, "handling update");

    let reply = match state.router.handle(&update).await {
        Ok(Some(reply)) => reply,
        Ok(None) => return,
        Err(e) => {
            error!(chat_id = chat_id.0, user_id = update.user_id().0, "update failed: {e}");
            return;
        }
    };

    if let Err(e) = deliver(
        state.messenger.as_ref(),
        chat_id,
        source,
        &reply,
        state.cfg.telegram_safe_limit,
    )
    .await
    {
        warn!(chat_id = chat_id.0, "failed to deliver reply: {e}");
    }
}
