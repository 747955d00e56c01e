//! Telegram Forwarder Library
//!
//! This library provides tools to:
//! - List the account's dialogs to a per-phone file
//! - Live-forward new messages between chats with keyword filtering
//! - Bulk-copy chat history in rate-limited batches
//! - Manage credentials and the Telegram session

pub mod chat;
pub mod config;
pub mod error;
pub mod session;

// Re-export common types
pub use config::Credentials;
pub use error::{Error, Result};
pub use session::{SessionLock, TelegramClient};

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;
