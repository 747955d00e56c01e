//! Credential storage and workflow constants
//!
//! Credentials live in a plaintext file of three lines: api id, api hash,
//! phone number. Environment variables (optionally via .env) take precedence
//! over file values.

use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Default credentials file, next to the binary's working directory.
pub const CREDENTIALS_FILE: &str = "credentials.txt";

/// Delay between live-forward poll iterations.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Maximum message ids submitted in one forward-messages call.
pub const BATCH_SIZE: usize = 50;

/// Courtesy delay after each full batch during bulk copy.
pub const BATCH_DELAY: Duration = Duration::from_secs(3);

/// Default historical threshold for the bulk-copy workflow (YYYY-MM-DD).
pub const DEFAULT_COPY_SINCE: &str = "2025-05-31";

/// Telegram API credentials for one user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_id: i32,
    pub api_hash: String,
    pub phone: String,
}

impl Credentials {
    pub fn new(api_id: i32, api_hash: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            api_id,
            api_hash: api_hash.into(),
            phone: phone.into(),
        }
    }

    /// Load credentials from a three-line file.
    ///
    /// Returns `Ok(None)` when the file does not exist or does not hold three
    /// lines; the caller decides whether to prompt for new values.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path.as_ref()) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut lines = content.lines();
        let (api_id, api_hash, phone) = match (lines.next(), lines.next(), lines.next()) {
            (Some(id), Some(hash), Some(phone)) => (id.trim(), hash.trim(), phone.trim()),
            _ => return Ok(None),
        };

        let api_id = match api_id.parse::<i32>() {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };

        Ok(Some(Self::new(api_id, api_hash, phone)))
    }

    /// Write credentials as three lines, overwriting any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = format!("{}\n{}\n{}\n", self.api_id, self.api_hash, self.phone);
        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Apply environment overrides: TG_API_ID, TG_API_HASH, TG_PHONE.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(id) = std::env::var("TG_API_ID") {
            if let Ok(parsed) = id.parse::<i32>() {
                self.api_id = parsed;
            }
        }
        if let Ok(hash) = std::env::var("TG_API_HASH") {
            self.api_hash = hash;
        }
        if let Ok(phone) = std::env::var("TG_PHONE") {
            self.phone = phone;
        }
        self
    }

    /// Session file for this phone number.
    pub fn session_file(&self) -> String {
        format!("session_{}.session", self.phone)
    }

    /// Lock file guarding the session for this phone number.
    pub fn lock_file(&self) -> String {
        format!("session_{}.lock", self.phone)
    }

    /// Output file for the chat listing workflow.
    pub fn chats_file(&self) -> String {
        format!("chats_of_{}.txt", self.phone)
    }
}
