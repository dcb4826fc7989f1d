use std::sync::Arc;

use anyhow::Context;

use nb_core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nb_core::logging::init("nb")?;

    let cfg = Arc::new(Config::load()?);
    let store = nb_core::open_store(&cfg)
        .with_context(|| format!("failed to open note store at {}", cfg.db_path.display()))?;

    nb_telegram::router::run_polling(cfg, store)
        .await
        .context("telegram bot failed")?;

    tracing::info!("bot stopped");
    Ok(())
}
