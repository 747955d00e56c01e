//! Error types for the Telegram forwarder

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Credentials file not found: {0}")]
    CredentialsNotFound(String),

    #[error("Session is locked by another process")]
    SessionLocked,

    #[error("Failed to acquire session lock: {0}")]
    LockError(String),

    #[error("Telegram API error: {0}")]
    TelegramError(String),

    #[error("Flood wait: retry after {0:?}")]
    FloodWait(Duration),

    #[error("Chat not found: {0}")]
    ChatNotFound(String),

    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<grammers_client::InvocationError> for Error {
    fn from(err: grammers_client::InvocationError) -> Self {
        if let grammers_client::InvocationError::Rpc(rpc) = &err {
            // The server reports FLOOD_WAIT_N; grammers parses N into `value`.
            if rpc.name.starts_with("FLOOD_WAIT") {
                let seconds = rpc.value.unwrap_or(0) as u64;
                return Error::FloodWait(Duration::from_secs(seconds));
            }
        }
        Error::TelegramError(err.to_string())
    }
}

impl Error {
    /// Whether the batch that hit this error may be retried as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::FloodWait(_))
    }
}
