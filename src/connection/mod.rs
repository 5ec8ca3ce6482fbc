//! Running telemetry connection.
//!
//! A [`Connection`] owns the background ingest task for one datagram source and
//! hands out streams of decoded records. Readers never block the task: every
//! subscription watches the shared [`TelemetrySnapshot`] and decodes the newest
//! stored packet for its category.

use futures::{Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::driver::Driver;
use crate::processor::{PacketProcessor, ProcessorStats};
use crate::provider::DatagramSource;
use crate::records::CategoryRecord;
use crate::reassembly::ReassemblyConfig;
use crate::snapshot::{RawPacket, TelemetrySnapshot};
use crate::stream::ThrottleExt;
use crate::types::{PacketCategory, UpdateRate};


/// Connection to a running datagram source
pub struct Connection {
    /// Snapshot written by the ingest task
    snapshot: Arc<TelemetrySnapshot>,

    /// Processor counters
    stats: watch::Receiver<ProcessorStats>,

    /// Cancellation token for stopping the task
    cancel: CancellationToken,

    /// Ingest task, taken once joined
    task: Option<JoinHandle<ProcessorStats>>,

    /// Source description for logs
    source: String,
}

impl Connection {
    /// Start ingesting from `source` into a fresh snapshot
    pub fn start<S>(source: S, reassembly: ReassemblyConfig) -> Self
    where
        S: DatagramSource,
    {
        let processor = PacketProcessor::new(Arc::new(TelemetrySnapshot::new()), reassembly);
        Self::with_processor(source, processor)
    }

    /// Start ingesting from `source` with a preconfigured processor
    pub fn with_processor<S>(source: S, processor: PacketProcessor) -> Self
    where
        S: DatagramSource,
    {
        let description = source.describe();
        let handle = Driver::spawn(source, processor);
        info!("Connection started ({})", description);

        Self {
            snapshot: handle.snapshot,
            stats: handle.stats,
            cancel: handle.cancel,
            task: Some(handle.task),
            source: description,
        }
    }

    /// Shared snapshot of the newest packet per category
    pub fn snapshot(&self) -> &Arc<TelemetrySnapshot> {
        &self.snapshot
    }

    /// Description of the datagram source
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Latest processor counters
    pub fn stats(&self) -> ProcessorStats {
        *self.stats.borrow()
    }

    /// Stream of processor counters, starting with the current value
    pub fn stats_updates(&self) -> impl Stream<Item = ProcessorStats> + 'static {
        WatchStream::new(self.stats.clone())
    }

    /// Whether the ingest task is still running
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Subscribe to decoded records of one category
    ///
    /// The stream yields the stored record immediately if one exists, then
    /// every subsequent update (or at most `hz` per second with
    /// [`UpdateRate::Max`], latest wins). Intermediate packets may be skipped
    /// when the consumer is slower than the source.
    pub fn subscribe<R>(&self, rate: UpdateRate) -> impl Stream<Item = R> + Unpin + Send + 'static
    where
        R: CategoryRecord,
    {
        self.subscribe_raw(R::CATEGORY, rate)
            .filter_map(|packet| async move {
                match packet.decode_as::<R>() {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!("Failed to decode {}: {}", R::CATEGORY, e);
                        None
                    }
                }
            })
            .boxed()
    }

    /// Subscribe to raw stored packets of one category
    pub fn subscribe_raw(
        &self,
        category: PacketCategory,
        rate: UpdateRate,
    ) -> impl Stream<Item = Arc<RawPacket>> + Unpin + Send + 'static {
        // Leading None means nothing received yet; skip it
        let packets =
            WatchStream::new(self.snapshot.subscribe(category)).filter_map(|opt| async move { opt });

        match rate.throttle_interval() {
            None => packets.boxed(),
            Some(interval) => packets.throttle(interval).boxed(),
        }
    }

    /// Wait for the source to end on its own and return the final counters
    pub async fn join(&mut self) -> ProcessorStats {
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(stats) => return stats,
                Err(e) => warn!("Ingest task failed: {}", e),
            }
        }
        self.stats()
    }

    /// Stop the ingest task and return the final counters
    pub async fn shutdown(mut self) -> ProcessorStats {
        debug!("Shutting down connection ({})", self.source);
        self.cancel.cancel();
        self.join().await
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        debug!("Dropping connection ({})", self.source);
        // Cancel tasks on drop for clean shutdown
        self.cancel.cancel();
    }
}
