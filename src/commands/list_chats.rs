//! List chats command
//!
//! Writes every dialog as `Chat ID: <id>, Title: <title>` to a per-phone
//! file and echoes the same lines to the console.

use std::fs::File;
use std::io::Write;

use crate::chat::{peer_id, peer_name};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::session::{SessionLock, TelegramClient};

pub async fn run(credentials: &Credentials) -> Result<usize> {
    let _lock = SessionLock::acquire(credentials)?;
    let client = TelegramClient::connect(credentials).await?;
    client.ensure_authorized(credentials).await?;

    let path = credentials.chats_file();
    let mut file = File::create(&path)?;

    let mut count = 0;
    let mut dialogs = client.iter_dialogs();

    while let Some(dialog) = dialogs
        .next()
        .await
        .map_err(|e| Error::TelegramError(e.to_string()))?
    {
        let line = format_dialog_line(peer_id(&dialog.peer), &peer_name(&dialog.peer));
        println!("{}", line);
        writeln!(file, "{}", line)?;
        count += 1;
    }

    println!("List of chats saved to {}", path);
    Ok(count)
}

fn format_dialog_line(id: i64, title: &str) -> String {
    format!("Chat ID: {}, Title: {}", id, title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_line_format() {
        assert_eq!(
            format_dialog_line(-1001234, "Rust News"),
            "Chat ID: -1001234, Title: Rust News"
        );
    }

    #[test]
    fn dialog_line_keeps_title_verbatim() {
        let line = format_dialog_line(42, "  spaced,title  ");
        assert_eq!(line, "Chat ID: 42, Title:   spaced,title  ");
    }
}
