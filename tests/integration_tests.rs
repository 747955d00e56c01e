//! Integration tests for the telegram_forwarder library
//!
//! These tests verify the public API and module interactions.

use std::time::Duration;

use telegram_forwarder::commands::copy::{forward_in_batches, CopyReport};
use telegram_forwarder::commands::{Cursor, KeywordFilter, MenuChoice};
use telegram_forwarder::config::{Credentials, BATCH_DELAY, BATCH_SIZE, POLL_INTERVAL};
use telegram_forwarder::{Error, Result};

// ============================================================================
// Credential Store
// ============================================================================

#[test]
fn credentials_round_trip_is_byte_identical() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("credentials.txt");

    let creds = Credentials::new(424242, "0123abcd", "+4915551234");
    creds.save(&path).expect("save");

    let raw = std::fs::read_to_string(&path).expect("read");
    assert_eq!(raw, "424242\n0123abcd\n+4915551234\n");

    let loaded = Credentials::load(&path).expect("load").expect("present");
    assert_eq!(loaded, creds);
}

#[test]
fn missing_credentials_file_is_a_sentinel_not_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let loaded = Credentials::load(dir.path().join("absent.txt")).expect("load");
    assert!(loaded.is_none());
}

// ============================================================================
// Live-forward building blocks
// ============================================================================

#[test]
fn cursor_tracks_the_maximum_id_seen() {
    let mut cursor = Cursor::new(0);
    let seen = [3, 1, 7, 7, 2];
    for id in seen {
        cursor.advance(id);
    }
    assert_eq!(cursor.last_id(), 7);

    // Never decreases, whatever comes in later.
    cursor.advance(-5);
    assert_eq!(cursor.last_id(), 7);
}

#[test]
fn keyword_filter_substring_containment() {
    let filter = KeywordFilter::from_keywords(["sale".to_string(), "free".to_string()]);
    assert!(filter.matches("FREE shipping"));
    assert!(!filter.matches("discount"));

    let pass_all = KeywordFilter::from_keywords(Vec::new());
    assert!(pass_all.matches("discount"));
    assert!(pass_all.matches(""));
}

// ============================================================================
// Bulk-copy batching
// ============================================================================

#[tokio::test(start_paused = true)]
async fn copy_batching_matches_the_documented_policy() {
    let ids: Vec<i32> = (1..=130).collect();
    let start = tokio::time::Instant::now();

    let mut sizes = Vec::new();
    let report = {
        let sizes = &mut sizes;
        forward_in_batches(&ids, move |batch| {
            sizes.push(batch.len());
            async { Ok(()) }
        })
        .await
    };

    assert_eq!(sizes, vec![BATCH_SIZE, BATCH_SIZE, 30]);
    assert_eq!(report.batches, 3);
    assert_eq!(report.forwarded, 130);
    // One courtesy delay after each full batch, none after the final one.
    assert_eq!(start.elapsed(), 2 * BATCH_DELAY);
}

#[tokio::test(start_paused = true)]
async fn flood_wait_of_ten_seconds_delays_once_and_retries_once() {
    let ids: Vec<i32> = (1..=10).collect();
    let start = tokio::time::Instant::now();

    let mut calls = 0usize;
    let report = {
        let calls = &mut calls;
        forward_in_batches(&ids, move |_| {
            *calls += 1;
            let first = *calls == 1;
            async move {
                if first {
                    Err(Error::FloodWait(Duration::from_secs(10)))
                } else {
                    Ok(())
                }
            }
        })
        .await
    };

    assert_eq!(calls, 2);
    assert_eq!(start.elapsed(), Duration::from_secs(10));
    assert_eq!(
        report,
        CopyReport {
            forwarded: 10,
            dropped: 0,
            batches: 1
        }
    );
}

// ============================================================================
// Menu
// ============================================================================

#[test]
fn menu_choice_nine_is_invalid() {
    assert_eq!(MenuChoice::parse("9"), None);
}

#[test]
fn menu_choices_map_to_workflows() {
    assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::ListChats));
    assert_eq!(MenuChoice::parse("2"), Some(MenuChoice::Forward));
    assert_eq!(MenuChoice::parse("3"), Some(MenuChoice::Copy));
}

// ============================================================================
// Error taxonomy
// ============================================================================

#[test]
fn flood_wait_is_the_only_retryable_error() {
    assert!(Error::FloodWait(Duration::from_secs(3)).is_retryable());
    assert!(!Error::TelegramError("other".into()).is_retryable());

    let failed: Result<()> = Err(Error::ChatNotFound("42".into()));
    assert!(!failed.unwrap_err().is_retryable());
}

#[test]
fn workflow_constants() {
    assert_eq!(POLL_INTERVAL, Duration::from_secs(5));
    assert_eq!(BATCH_DELAY, Duration::from_secs(3));
    assert_eq!(BATCH_SIZE, 50);
}
