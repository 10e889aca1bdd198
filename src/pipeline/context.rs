//! Pipeline handles: what `start_pipeline` returns and how a caller waits on or stops a run.

use anyhow::Result;
use log::debug;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::error::CrawlError;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::channel::ChannelStats;
use crate::pipeline::counter::IndexCounter;
use crate::pipeline::shutdown::ShutdownOutcome;
use crate::{PipelineReport, WorkerStats};

/// Cancels every task of one pipeline. Cheap to clone; safe to move into a signal handler.
#[derive(Clone, Debug, Default)]
pub struct PipelineCanceller {
    tokens: Vec<CancelToken>,
}

impl PipelineCanceller {
    pub(crate) fn new(tokens: Vec<CancelToken>) -> Self {
        Self { tokens }
    }

    /// Signal each task individually. Blocked sends/receives return at once; nothing partial is
    /// enqueued or dequeued.
    pub fn cancel(&self) {
        for token in &self.tokens {
            token.cancel();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.tokens.iter().any(CancelToken::is_cancelled)
    }
}

/// Running pipeline. Dropping the handle detaches the threads; call [`join`](Self::join) to wait.
pub struct PipelineHandle {
    pub(crate) coordinator: JoinHandle<ShutdownOutcome>,
    pub(crate) workers: Vec<JoinHandle<WorkerStats>>,
    pub(crate) counter: IndexCounter,
    pub(crate) channel_stats: Arc<ChannelStats>,
    pub(crate) canceller: PipelineCanceller,
    pub(crate) worker_count: usize,
    pub(crate) capacity: usize,
}

impl PipelineHandle {
    /// Live counter of successfully indexed files; final once `join` returns.
    pub fn counter(&self) -> &IndexCounter {
        &self.counter
    }

    pub fn channel_stats(&self) -> &ChannelStats {
        &self.channel_stats
    }

    pub fn canceller(&self) -> PipelineCanceller {
        self.canceller.clone()
    }

    pub fn cancel(&self) {
        self.canceller.cancel();
    }

    /// True once the coordinator and every worker have exited.
    pub fn is_finished(&self) -> bool {
        self.coordinator.is_finished() && self.workers.iter().all(|h| h.is_finished())
    }

    /// Wait for the coordinator (and thus every crawler), then every worker.
    pub fn join(self) -> Result<PipelineReport> {
        let outcome = self
            .coordinator
            .join()
            .map_err(|_| CrawlError::Panicked("shutdown"))?;

        let mut totals = WorkerStats::default();
        let mut workers_stopped = 0;
        for handle in self.workers {
            let stats = handle.join().map_err(|_| CrawlError::Panicked("worker"))?;
            workers_stopped += usize::from(stats.got_stop);
            totals.merge(&stats);
        }

        let report = PipelineReport {
            indexed: self.counter.get(),
            failed: totals.failed,
            filtered: totals.filtered,
            emitted: outcome.crawl.emitted,
            duplicates: outcome.crawl.duplicates,
            dirs: outcome.crawl.dirs,
            workers: self.worker_count,
            capacity: self.capacity,
            peak_occupancy: self.channel_stats.peak_occupancy(),
            channel_sent: self.channel_stats.sent(),
            channel_received: self.channel_stats.received(),
            sentinels_sent: outcome.sentinels_sent,
            workers_stopped,
            crawler_panics: outcome.crawler_panics,
            cancelled: self.canceller.is_cancelled(),
        };
        debug!("pipeline finished: {:?}", report);
        Ok(report)
    }
}
