//! Core domain + application logic for the notes bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the messaging port,
//! implemented in the adapter crate.

pub mod config;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod notes;
pub mod router;
pub mod security;

use std::sync::Arc;

pub use errors::{Error, Result};

use config::{Config, StorageKind};
use notes::{MemoryNoteStore, NoteStore, SqliteNoteStore};

/// Build the note store selected by the configuration.
pub fn open_store(cfg: &Config) -> Result<Arc<dyn NoteStore>> {
    Ok(match cfg.storage {
        StorageKind::Memory => Arc::new(MemoryNoteStore::new()),
        StorageKind::Sqlite => Arc::new(SqliteNoteStore::open(&cfg.db_path)?),
    })
}
