//! Replay source for captured datagrams

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::{Interval, MissedTickBehavior, interval};
use tracing::{debug, trace};

use crate::Result;
use crate::provider::DatagramSource;

/// Replays an in-memory list of datagrams in order
pub struct ReplaySource {
    /// Datagrams not yet delivered
    pending: VecDeque<Vec<u8>>,

    /// Total datagrams in the capture
    total: usize,

    /// Optional pacing between datagrams
    pacing: Option<Interval>,
}

impl ReplaySource {
    /// Replay datagrams back to back
    pub fn new<I>(datagrams: I) -> Self
    where
        I: IntoIterator<Item = Vec<u8>>,
    {
        let pending: VecDeque<_> = datagrams.into_iter().collect();
        let total = pending.len();
        Self { pending, total, pacing: None }
    }

    /// Deliver at most one datagram per `period`
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_interval(mut self, period: Duration) -> Self {
        let mut pacing = interval(period);
        pacing.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.pacing = Some(pacing);
        self
    }

    /// Datagrams not yet delivered
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }
}

#[async_trait::async_trait]
impl DatagramSource for ReplaySource {
    async fn next_datagram(&mut self) -> Result<Option<Vec<u8>>> {
        if self.pending.is_empty() {
            debug!("Reached end of replay");
            return Ok(None);
        }

        if let Some(pacing) = self.pacing.as_mut() {
            pacing.tick().await;
        }

        let datagram = self.pending.pop_front();
        trace!(
            "Datagram {}/{}: {} bytes",
            self.total - self.pending.len(),
            self.total,
            datagram.as_ref().map_or(0, Vec::len)
        );
        Ok(datagram)
    }

    fn describe(&self) -> String {
        format!("replay of {} datagrams", self.total)
    }
}
