//! Messenger-facing abstractions: incoming updates, replies, and the outbound port.

pub mod delivery;
pub mod port;
pub mod types;
