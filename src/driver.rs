//! Driver spawns and manages the datagram ingest task

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace};

use crate::processor::{PacketProcessor, ProcessorStats};
use crate::provider::DatagramSource;
use crate::snapshot::TelemetrySnapshot;

/// Consecutive source errors tolerated before the driver gives up
pub const MAX_CONSECUTIVE_ERRORS: u32 = 10;

/// Handles returned when the driver task is spawned
pub struct DriverHandle {
    /// Snapshot the task writes into
    pub snapshot: Arc<TelemetrySnapshot>,
    /// Latest processor counters, published after every datagram
    pub stats: watch::Receiver<ProcessorStats>,
    /// Cancellation token for graceful shutdown
    pub cancel: CancellationToken,
    /// Completes when the task ends, with the final counters
    pub task: JoinHandle<ProcessorStats>,
}

/// Driver spawns and manages the ingest task
///
/// The task owns the source and the processor: it is the single writer of the
/// snapshot, while any number of readers use the snapshot concurrently.
pub struct Driver;

impl Driver {
    /// Spawn the ingest task for the given source
    pub fn spawn<S>(source: S, processor: PacketProcessor) -> DriverHandle
    where
        S: DatagramSource,
    {
        let snapshot = Arc::clone(processor.snapshot());
        let (stats_tx, stats_rx) = watch::channel(processor.stats());
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        let task = tokio::spawn(async move {
            Self::ingest_task(source, processor, stats_tx, cancel_task).await
        });

        DriverHandle { snapshot, stats: stats_rx, cancel, task }
    }

    /// Ingest task - receives datagrams and feeds the processor
    async fn ingest_task<S>(
        mut source: S,
        mut processor: PacketProcessor,
        stats_tx: watch::Sender<ProcessorStats>,
        cancel: CancellationToken,
    ) -> ProcessorStats
    where
        S: DatagramSource,
    {
        info!("Ingest task started ({})", source.describe());
        let mut error_count = 0u32;

        loop {
            // Use select to allow cancellation during source.next_datagram()
            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Ingest task cancelled");
                    break;
                }
                result = source.next_datagram() => result,
            };

            match result {
                Ok(Some(datagram)) => {
                    error_count = 0;
                    // Per-datagram errors are logged by the processor and never stop the task
                    match processor.ingest(&datagram) {
                        Ok(outcome) => trace!(?outcome, "Datagram processed"),
                        Err(e) => trace!("Datagram skipped: {}", e),
                    }
                    stats_tx.send_replace(processor.stats());
                }
                Ok(None) => {
                    info!("Source ended after {} datagrams", processor.stats().datagrams);
                    break;
                }
                Err(e) => {
                    // Source error - don't crash on transient failures
                    error_count += 1;
                    error!("Source error ({}/{}): {}", error_count, MAX_CONSECUTIVE_ERRORS, e);

                    if error_count >= MAX_CONSECUTIVE_ERRORS {
                        error!("Too many source errors, shutting down");
                        break;
                    }

                    // Exponential backoff: 100ms, 200ms, 400ms, ... capped at 1.6s
                    let backoff = Duration::from_millis(50 * (1 << error_count.min(5)));
                    debug!("Retrying in {:?}", backoff);
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(backoff) => {}
                    }
                }
            }
        }

        let stats = processor.stats();
        stats_tx.send_replace(stats);
        info!("Ingest task ended (updates: {}, errors: {})", stats.updates, stats.errors());
        stats
    }
}
