//! Live-forward command
//!
//! Polls the source chat for messages newer than the cursor and re-sends
//! matching text to the destination chat. Two phases: catch-up (read the
//! latest message id as the initial cursor) and an endless poll loop that
//! exits on Ctrl+C.

use grammers_client::message::Message;
use grammers_client::Client;
use grammers_session::types::PeerRef;
use tokio::signal;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::chat::{find_peer, peer_ref};
use crate::config::{Credentials, POLL_INTERVAL};
use crate::error::{Error, Result};
use crate::session::{SessionLock, TelegramClient};

/// Case-insensitive substring filter over message text.
///
/// An empty filter matches every message, including ones without text;
/// whether those are actually re-sent is decided at the send step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordFilter {
    keywords: Vec<String>,
}

impl KeywordFilter {
    /// Parse a comma-separated keyword list. Blank input yields an empty
    /// filter that forwards everything.
    pub fn parse(input: &str) -> Self {
        Self::from_keywords(input.split(',').map(str::to_string))
    }

    pub fn from_keywords<I>(keywords: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let keywords = keywords
            .into_iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        Self { keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn matches(&self, text: &str) -> bool {
        if self.keywords.is_empty() {
            return true;
        }
        let text = text.to_lowercase();
        self.keywords.iter().any(|keyword| text.contains(keyword))
    }
}

/// Highest message id already processed. Only ever advances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    last_id: i32,
}

impl Cursor {
    pub fn new(last_id: i32) -> Self {
        Self { last_id }
    }

    pub fn last_id(&self) -> i32 {
        self.last_id
    }

    /// True when the id has not been processed yet.
    pub fn is_new(&self, id: i32) -> bool {
        id > self.last_id
    }

    pub fn advance(&mut self, id: i32) {
        self.last_id = self.last_id.max(id);
    }
}

pub async fn run(
    credentials: &Credentials,
    source_chat_id: i64,
    destination_chat_id: i64,
    filter: KeywordFilter,
) -> Result<()> {
    let _lock = SessionLock::acquire(credentials)?;
    let client = TelegramClient::connect(credentials).await?;
    client.ensure_authorized(credentials).await?;

    let source = peer_ref(&find_peer(&client, source_chat_id).await?).await?;
    let destination = peer_ref(&find_peer(&client, destination_chat_id).await?).await?;

    // Catch-up: everything that already exists is considered processed.
    let mut cursor = Cursor::new(latest_message_id(&client, source).await?);
    info!(
        source = source_chat_id,
        destination = destination_chat_id,
        cursor = cursor.last_id(),
        "Starting forward loop"
    );
    println!("Forwarding new messages. Press Ctrl+C to stop.");

    loop {
        println!("Checking for messages and forwarding them...");
        let new_messages = fetch_newer_than(&client, source, &cursor).await?;

        for message in &new_messages {
            let text = message.text();
            if filter.matches(text) {
                if text.is_empty() {
                    debug!(id = message.id(), "Skipping message without text");
                } else {
                    if !filter.is_empty() {
                        println!("Message contains a keyword: {}", text);
                    }
                    client
                        .send_message(destination, text)
                        .await
                        .map_err(Error::from)?;
                    println!("Message forwarded");
                }
            }
            cursor.advance(message.id());
        }

        tokio::select! {
            _ = signal::ctrl_c() => {
                println!("\nStopping forward loop...");
                break;
            }
            _ = sleep(POLL_INTERVAL) => {}
        }
    }

    Ok(())
}

/// Id of the most recent message in the chat, or 0 when it is empty.
async fn latest_message_id(client: &Client, peer: &Peer) -> Result<i32> {
    let mut iter = client.iter_messages(peer);
    if let Some(msg) = iter.next().await.transpose() {
        let msg = msg.map_err(|e| Error::TelegramError(e.to_string()))?;
        Ok(msg.id())
    } else {
        Ok(0)
    }
}

/// Fetch all messages newer than the cursor, oldest first.
async fn fetch_newer_than(client: &Client, peer: &Peer, cursor: &Cursor) -> Result<Vec<Message>> {
    let mut messages = Vec::new();
    let mut iter = client.iter_messages(peer);

    while let Some(msg) = iter.next().await.transpose() {
        let msg = msg.map_err(|e| Error::TelegramError(e.to_string()))?;
        if !cursor.is_new(msg.id()) {
            break;
        }
        messages.push(msg);
    }

    // Iteration is newest-first; process in chronological order.
    messages.reverse();
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_filter_matches_case_insensitively() {
        let filter = KeywordFilter::parse("sale,free");
        assert!(filter.matches("FREE shipping"));
        assert!(filter.matches("flash SALE today"));
        assert!(!filter.matches("discount"));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = KeywordFilter::parse("");
        assert!(filter.is_empty());
        assert!(filter.matches("anything"));
        assert!(filter.matches(""));
    }

    #[test]
    fn textless_message_never_matches_a_keyword() {
        let filter = KeywordFilter::parse("sale");
        assert!(!filter.matches(""));
    }

    #[test]
    fn parse_trims_and_drops_blank_entries() {
        let filter = KeywordFilter::parse(" Sale , , FREE ,");
        assert_eq!(filter, KeywordFilter::from_keywords(["sale".to_string(), "free".to_string()]));
    }

    #[test]
    fn cursor_advances_to_max_seen() {
        let mut cursor = Cursor::new(10);
        for id in [12, 11, 30, 5] {
            cursor.advance(id);
        }
        assert_eq!(cursor.last_id(), 30);
    }

    #[test]
    fn cursor_never_decreases() {
        let mut cursor = Cursor::new(100);
        cursor.advance(1);
        assert_eq!(cursor.last_id(), 100);
    }

    #[test]
    fn cursor_is_new_is_strictly_greater() {
        let cursor = Cursor::new(42);
        assert!(!cursor.is_new(41));
        assert!(!cursor.is_new(42));
        assert!(cursor.is_new(43));
    }
}
