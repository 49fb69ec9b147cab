//! Newline-delimited JSON event feed.
//!
//! Each non-blank line is one `ExchangeEvent`. Undecodable lines are logged
//! and skipped; the feed never stops on bad data.

use rtg_core::ExchangeEvent;
use rtg_telemetry::Metrics;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::AppResult;

/// Counters for one feed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub lines: u64,
    pub decoded: u64,
    pub rejected: u64,
}

/// Read events from `reader` until EOF or until the receiver is dropped.
pub async fn read_events<R>(reader: R, tx: mpsc::Sender<ExchangeEvent>) -> AppResult<FeedStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = FeedStats::default();
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        stats.lines += 1;
        if line.trim().is_empty() {
            continue;
        }

        match ExchangeEvent::from_json_line(&line) {
            Ok(event) => {
                stats.decoded += 1;
                if tx.send(event).await.is_err() {
                    debug!("Event receiver dropped, stopping feed");
                    break;
                }
            }
            Err(e) => {
                stats.rejected += 1;
                Metrics::feed_decode_error();
                warn!(line_no = stats.lines, error = %e, "Skipping undecodable event");
            }
        }
    }

    info!(
        lines = stats.lines,
        decoded = stats.decoded,
        rejected = stats.rejected,
        "Feed finished"
    );
    Ok(stats)
}

/// Spawn the feed reader for a file path, or stdin when `source` is `None`.
pub fn spawn_feed(
    source: Option<String>,
    tx: mpsc::Sender<ExchangeEvent>,
) -> JoinHandle<AppResult<FeedStats>> {
    tokio::spawn(async move {
        match source {
            Some(path) => {
                info!(path = %path, "Reading events from file");
                let file = tokio::fs::File::open(&path).await?;
                read_events(BufReader::new(file), tx).await
            }
            None => {
                info!("Reading events from stdin");
                read_events(BufReader::new(tokio::io::stdin()), tx).await
            }
        }
    })
}
