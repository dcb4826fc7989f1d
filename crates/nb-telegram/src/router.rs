use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};
use tracing::{info, warn};

use nb_core::{
    config::Config, messaging::port::MessagingPort, notes::NoteStore, router::CommandRouter,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub router: CommandRouter,
    pub messenger: Arc<dyn MessagingPort>,
    /// Our `@username`, used to skip group commands meant for other bots.
    pub bot_username: Option<String>,
}

impl AppState {
    pub fn new(
        cfg: Arc<Config>,
        store: Arc<dyn NoteStore>,
        messenger: Arc<dyn MessagingPort>,
        bot_username: Option<String>,
    ) -> Self {
        Self {
            cfg,
            router: CommandRouter::new(store),
            messenger,
            bot_username,
        }
    }
}

pub async fn run_polling(cfg: Arc<Config>, store: Arc<dyn NoteStore>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let bot_username = match bot.get_me().await {
        Ok(me) => {
            info!("notes bot started: @{}", me.username());
            Some(me.username().to_string())
        }
        Err(e) => {
            warn!("get_me failed, continuing anyway: {e}");
            None
        }
    };
    info!(storage = ?cfg.storage, db_path = %cfg.db_path.display(), "note storage ready");
    if cfg.telegram_allowed_users.is_empty() {
        info!("no TELEGRAM_ALLOWED_USERS set; bot is open to everyone");
    } else {
        info!("allowed users: {}", cfg.telegram_allowed_users.len());
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState::new(cfg, store, messenger, bot_username));

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
