//! Termination protocol: wait for every crawler, then send exactly one stop marker per worker.
//!
//! Because all stop markers are enqueued after the last real item of the last crawler, FIFO
//! order guarantees each worker drains real work before it can see a marker, and with one
//! marker per worker none of them blocks forever.

use log::{debug, warn};
use std::thread::{self, JoinHandle};

use crate::pipeline::cancel::CancelToken;
use crate::pipeline::channel::ChannelSender;
use crate::{CrawlStats, WorkItem};

pub struct ShutdownCoordinator {
    tx: ChannelSender,
    workers: usize,
    cancel: CancelToken,
}

/// What the coordinator saw: merged crawl totals plus how the shutdown went.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShutdownOutcome {
    pub crawl: CrawlStats,
    pub sentinels_sent: usize,
    pub crawler_panics: usize,
}

impl ShutdownCoordinator {
    /// `workers` is the real pool size, fixed at pipeline start.
    pub fn new(tx: ChannelSender, workers: usize, cancel: CancelToken) -> Self {
        Self {
            tx,
            workers,
            cancel,
        }
    }

    /// Join all crawlers (the barrier), then enqueue `workers` stop markers.
    ///
    /// A panicked crawler still counts as finished. If the coordinator is cancelled or every
    /// worker is gone, it stops sending; dropping its sender then lets any remaining worker see
    /// the channel close once it is drained.
    pub fn run(self, crawlers: Vec<JoinHandle<CrawlStats>>) -> ShutdownOutcome {
        let mut outcome = ShutdownOutcome::default();
        for handle in crawlers {
            match handle.join() {
                Ok(stats) => outcome.crawl.merge(&stats),
                Err(_) => {
                    warn!("crawler thread panicked");
                    outcome.crawler_panics += 1;
                }
            }
        }
        debug!(
            "all crawlers finished ({} files sent), sending {} stop markers",
            outcome.crawl.emitted, self.workers
        );
        for _ in 0..self.workers {
            if let Err(err) = self.tx.send(WorkItem::Stop, &self.cancel) {
                debug!(
                    "stop markers interrupted after {}: {}",
                    outcome.sentinels_sent, err
                );
                break;
            }
            outcome.sentinels_sent += 1;
        }
        outcome
    }
}

pub fn spawn_coordinator_thread(
    coordinator: ShutdownCoordinator,
    crawlers: Vec<JoinHandle<CrawlStats>>,
) -> std::io::Result<JoinHandle<ShutdownOutcome>> {
    thread::Builder::new()
        .name("shutdown".to_string())
        .spawn(move || coordinator.run(crawlers))
}
