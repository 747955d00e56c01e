//! Chat operations and peer resolution

use grammers_client::peer::Peer;
use grammers_client::Client;
use grammers_session::types::PeerRef;

use crate::error::{Error, Result};

/// Get the numeric ID from a Peer
pub fn peer_id(peer: &Peer) -> i64 {
    match peer {
        Peer::User(u) => u.raw.id(),
        Peer::Group(g) => match &g.raw {
            grammers_tl_types::enums::Chat::Empty(c) => c.id,
            grammers_tl_types::enums::Chat::Chat(c) => c.id,
            grammers_tl_types::enums::Chat::Forbidden(c) => c.id,
            grammers_tl_types::enums::Chat::Channel(c) => c.id,
            grammers_tl_types::enums::Chat::ChannelForbidden(c) => c.id,
        },
        Peer::Channel(c) => c.raw.id,
    }
}

/// Get the display name for a peer
pub fn peer_name(peer: &Peer) -> String {
    peer.name()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Convert a resolved peer into the reference API calls take.
pub async fn peer_ref(peer: &Peer) -> Result<PeerRef> {
    peer.to_ref()
        .await
        .map_err(|e| Error::TelegramError(e.to_string()))?
        .ok_or_else(|| {
            Error::TelegramError(format!("Peer {} has no usable reference", peer_id(peer)))
        })
}

/// Resolve a chat id to a Peer by scanning the account's dialogs.
///
/// The chat must be present in the user's dialogs; that is all the
/// forwarder ever needs.
pub async fn find_peer(client: &Client, chat_id: i64) -> Result<Peer> {
    let mut dialogs = client.iter_dialogs();

    while let Some(dialog) = dialogs
        .next()
        .await
        .map_err(|e| Error::TelegramError(e.to_string()))?
    {
        if peer_id(&dialog.peer) == chat_id {
            return Ok(dialog.peer.clone());
        }
    }

    Err(Error::ChatNotFound(format!(
        "Chat {} not found in dialogs",
        chat_id
    )))
}
