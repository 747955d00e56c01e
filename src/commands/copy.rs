//! Bulk-copy command
//!
//! Forwards a chat's history to another chat in batches of 50 ids, with a
//! courtesy delay between batches. A FLOOD_WAIT answer sleeps exactly the
//! server-specified duration and retries the same batch; any other error
//! drops the batch and the workflow continues.

use std::future::Future;

use chrono::{DateTime, TimeZone, Utc};
use grammers_client::peer::Peer;
use grammers_client::Client;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::chat::find_peer;
use crate::config::{Credentials, BATCH_DELAY, BATCH_SIZE};
use crate::error::{Error, Result};
use crate::session::{SessionLock, TelegramClient};

/// Counters for one bulk-copy run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyReport {
    pub forwarded: usize,
    pub dropped: usize,
    pub batches: usize,
}

/// Historical threshold the original rollout used; messages sent before it
/// are never copied.
pub fn default_since() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 31, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

pub async fn run(
    credentials: &Credentials,
    source_chat_id: i64,
    destination_chat_id: i64,
    since: DateTime<Utc>,
) -> Result<CopyReport> {
    let _lock = SessionLock::acquire(credentials)?;
    let client = TelegramClient::connect(credentials).await?;
    client.ensure_authorized(credentials).await?;

    let source = find_peer(&client, source_chat_id).await?;
    let destination = find_peer(&client, destination_chat_id).await?;

    println!(
        "Starting to copy messages from {} to {}...",
        source_chat_id, destination_chat_id
    );

    let ids = collect_ids_since(&client, &source, since).await?;
    info!(total = ids.len(), %since, "Collected message ids to copy");

    let report = forward_in_batches(&ids, |batch| {
        let client = &client.client;
        let source = &source;
        let destination = &destination;
        async move {
            client
                .forward_messages(destination, &batch, source)
                .await
                .map_err(Error::from)?;
            Ok(())
        }
    })
    .await;

    println!("Finished copying messages!");
    Ok(report)
}

/// Collect ids of all messages dated on or after `since`, oldest first.
async fn collect_ids_since(
    client: &Client,
    peer: &Peer,
    since: DateTime<Utc>,
) -> Result<Vec<i32>> {
    let mut ids = Vec::new();
    let mut iter = client.iter_messages(peer);

    while let Some(msg) = iter.next().await.transpose() {
        let msg = msg.map_err(|e| Error::TelegramError(e.to_string()))?;
        if msg.date() < since {
            break;
        }
        ids.push(msg.id());
    }

    // Iteration is newest-first; forward in chronological order.
    ids.reverse();
    Ok(ids)
}

/// Submit ids in batches of BATCH_SIZE through `submit`, sleeping
/// BATCH_DELAY after every full batch that is not the last one. Flood waits
/// are retried in place; any other error drops that batch and the loop
/// moves on.
pub async fn forward_in_batches<F, Fut>(ids: &[i32], mut submit: F) -> CopyReport
where
    F: FnMut(Vec<i32>) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let chunks: Vec<&[i32]> = ids.chunks(BATCH_SIZE).collect();
    let mut report = CopyReport::default();

    for (index, chunk) in chunks.iter().enumerate() {
        let batch = chunk.to_vec();
        report.batches += 1;

        match submit_with_flood_retry(|| submit(batch.clone())).await {
            Ok(()) => {
                println!("Forwarded batch of {} messages.", batch.len());
                report.forwarded += batch.len();
            }
            Err(err) => {
                eprintln!("Error forwarding batch: {}", err);
                report.dropped += batch.len();
            }
        }

        let is_full = batch.len() == BATCH_SIZE;
        let is_last = index + 1 == chunks.len();
        if is_full && !is_last {
            sleep(BATCH_DELAY).await;
        }
    }

    report
}

/// Retry the same submission for as long as the server asks us to wait;
/// any other result is final.
async fn submit_with_flood_retry<F, Fut>(mut attempt: F) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<()>>,
{
    loop {
        match attempt().await {
            Err(Error::FloodWait(wait)) => {
                warn!(?wait, "Flood wait, sleeping before retrying batch");
                println!("Flood wait: sleeping for {} seconds.", wait.as_secs());
                sleep(wait).await;
            }
            other => return other,
        }
    }
}
