use crate::{
    domain::{ChatId, MessageRef},
    formatting::split_message,
    messaging::{
        port::MessagingPort,
        types::{Delivery, Keyboard, Reply},
    },
    Result,
};

/// Deliver a reply, chunking text that would exceed `limit`.
///
/// The keyboard rides on the last chunk. An `EditSource` reply rewrites `source`
/// with the first chunk and sends the rest as new messages; without a source
/// message it falls back to sending.
pub async fn deliver(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    source: Option<MessageRef>,
    reply: &Reply,
    limit: usize,
) -> Result<()> {
    let limit = limit.min(messenger.capabilities().max_message_len);
    let chunks = split_message(&reply.text, limit);
    let last = chunks.len().saturating_sub(1);

    for (i, chunk) in chunks.iter().enumerate() {
        let keyboard = if i == last {
            reply.keyboard.as_ref()
        } else {
            None
        };

        let edit_target = match (i, reply.delivery, source) {
            (0, Delivery::EditSource, Some(msg)) if messenger.capabilities().supports_edit => {
                Some(msg)
            }
            _ => None,
        };

        match edit_target {
            Some(msg) => {
                let inline = match keyboard {
                    Some(Keyboard::Inline(k)) => Some(k),
                    _ => None,
                };
                messenger.edit_text(msg, chunk, inline).await?;
            }
            None => {
                messenger.send_text(chat_id, chunk, keyboard).await?;
            }
        }
    }
    Ok(())
}
