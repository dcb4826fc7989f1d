use std::sync::Arc;

use teloxide::prelude::*;
use tracing::warn;

use nb_core::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{self, IncomingUpdate},
    security::is_authorized,
};

use crate::handlers::route_and_reply;
use crate::router::AppState;

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    let cb_id = q.id.clone();
    let user_id = UserId(q.from.id.0 as i64);
    let source = q.message.as_ref().map(|m| MessageRef {
        chat_id: ChatId(m.chat.id.0),
        message_id: MessageId(m.id.0),
    });
    let data = q.data.clone().unwrap_or_default();

    if !is_authorized(Some(user_id), &state.cfg.telegram_allowed_users) {
        warn!(user_id = user_id.0, "unauthorized callback");
        answer(&state, &cb_id, Some("Unauthorized")).await;
        return Ok(());
    }

    // Always answer so the client stops showing the spinner.
    answer(&state, &cb_id, None).await;

    let Some(source) = source else {
        return Ok(());
    };
    if data.is_empty() {
        return Ok(());
    }

    let update = IncomingUpdate::Callback(types::CallbackQuery {
        chat_id: source.chat_id,
        user_id,
        data,
    });

    route_and_reply(&state, update, Some(source)).await;
    Ok(())
}

async fn answer(state: &AppState, cb_id: &str, text: Option<&str>) {
    if let Err(e) = state.messenger.answer_callback_query(cb_id, text).await {
        warn!("failed to answer callback query: {e}");
    }
}
