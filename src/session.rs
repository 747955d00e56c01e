//! Session management for the Telegram client
//!
//! Provides:
//! - File-based session locking to prevent parallel use of one account
//! - Per-phone session storage
//! - Client creation and the one-time-code authorization flow

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use fs2::FileExt;
use grammers_client::Client;
use grammers_mtsender::{SenderPool, SenderPoolHandle};
use grammers_session::storages::SqliteSession;
use grammers_session::updates::UpdatesLike;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Credentials;
use crate::error::{Error, Result};

/// Session lock guard that ensures exclusive access to one Telegram session.
pub struct SessionLock {
    path: PathBuf,
    lock_file: Option<File>,
}

impl SessionLock {
    /// Acquire an exclusive lock for the given account.
    pub fn acquire(credentials: &Credentials) -> Result<Self> {
        Self::acquire_path(credentials.lock_file())
    }

    fn acquire_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| Error::LockError(format!("Failed to open lock file: {}", e)))?;

        match lock_file.try_lock_exclusive() {
            Ok(()) => Ok(Self {
                path,
                lock_file: Some(lock_file),
            }),
            Err(_) => {
                eprintln!(
                    "Session {} is already in use by another process. \
                     Wait for it to finish and try again.",
                    path.display()
                );
                Err(Error::SessionLocked)
            }
        }
    }

    /// Release the lock manually.
    pub fn release(&mut self) {
        if let Some(ref file) = self.lock_file {
            let _ = file.unlock();
        }
        self.lock_file = None;
        let _ = std::fs::remove_file(&self.path);
    }
}

impl Drop for SessionLock {
    fn drop(&mut self) {
        self.release();
    }
}

/// Holder for SenderPool components and Client
pub struct TelegramClient {
    pub client: Client,
    pub handle: SenderPoolHandle,
    // Kept alive so the pool can keep delivering updates.
    _updates: mpsc::UnboundedReceiver<UpdatesLike>,
    _runner_handle: tokio::task::JoinHandle<()>,
}

impl TelegramClient {
    /// Open (or create) the per-phone session and connect.
    pub async fn connect(credentials: &Credentials) -> Result<Self> {
        let session = SqliteSession::open(&credentials.session_file())
            .await
            .map_err(|e| Error::TelegramError(format!("Failed to open session: {}", e)))?;
        let session = Arc::new(session);

        let pool = SenderPool::new(session, credentials.api_id);
        let client = Client::new(pool.handle.clone());

        let SenderPool {
            runner,
            updates,
            handle,
        } = pool;

        // Runner drives the network connection in the background.
        let runner_handle = tokio::spawn(async move {
            runner.run().await;
        });

        Ok(Self {
            client,
            handle: handle.thin,
            _updates: updates,
            _runner_handle: runner_handle,
        })
    }

    /// Make sure the session is signed in, running the one-time-code
    /// challenge when it is not.
    pub async fn ensure_authorized(&self, credentials: &Credentials) -> Result<()> {
        let authorized = self.client.is_authorized().await.map_err(Error::from)?;
        if authorized {
            return Ok(());
        }

        info!(phone = %credentials.phone, "Session not authorized, requesting login code");
        let token = self
            .client
            .request_login_code(&credentials.phone, &credentials.api_hash)
            .await
            .map_err(|e| Error::AuthorizationFailed(format!("Failed to request code: {}", e)))?;

        let code = prompt_login_code()?;

        let user = self
            .client
            .sign_in(&token, &code)
            .await
            .map_err(|e| Error::AuthorizationFailed(format!("Failed to sign in: {}", e)))?;

        println!("Signed in as {}", user.full_name());
        Ok(())
    }
}

// Allow using TelegramClient as &Client
impl std::ops::Deref for TelegramClient {
    type Target = Client;

    fn deref(&self) -> &Self::Target {
        &self.client
    }
}

fn prompt_login_code() -> Result<String> {
    print!("Enter the code: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().read_line(&mut code)?;
    Ok(code.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn lock_path(dir: &Path) -> PathBuf {
        dir.join("session_test.lock")
    }

    #[test]
    fn acquire_creates_lock_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = lock_path(temp.path());

        assert!(!path.exists());
        let mut lock = SessionLock::acquire_path(&path).expect("lock");
        assert!(path.exists());
        lock.release();
    }

    #[test]
    fn release_removes_lock_file() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = lock_path(temp.path());

        let mut lock = SessionLock::acquire_path(&path).expect("lock");
        assert!(path.exists());
        lock.release();
        assert!(!path.exists());
    }

    #[test]
    fn lock_dropped_releases_automatically() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = lock_path(temp.path());

        {
            let _lock = SessionLock::acquire_path(&path).expect("lock");
            assert!(path.exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn double_release_is_safe() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = lock_path(temp.path());

        let mut lock = SessionLock::acquire_path(&path).expect("lock");
        lock.release();
        lock.release(); // Should not panic
    }

    #[test]
    fn lock_paths_derive_from_phone() {
        let creds = Credentials::new(1, "hash", "+1555");
        assert_eq!(creds.lock_file(), "session_+1555.lock");
        assert_eq!(creds.session_file(), "session_+1555.session");
    }
}
