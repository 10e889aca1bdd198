//! Consumer side: workers pull files off the channel and hand them to the indexer.

use log::{debug, warn};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::error::ChannelError;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::channel::ChannelReceiver;
use crate::pipeline::counter::IndexCounter;
use crate::pipeline::filter::NameFilter;
use crate::{FileRef, WorkItem, WorkerStats};

/// Per-file indexing callback. Keep it fast; it runs on a worker thread while crawlers may be
/// blocked on a full channel.
pub trait Indexer: Send + Sync {
    fn index(&self, file: &FileRef) -> anyhow::Result<()>;
}

impl<F> Indexer for F
where
    F: Fn(&FileRef) -> anyhow::Result<()> + Send + Sync,
{
    fn index(&self, file: &FileRef) -> anyhow::Result<()> {
        self(file)
    }
}

pub struct Worker {
    rx: ChannelReceiver,
    indexer: Arc<dyn Indexer>,
    name_filter: Option<Arc<NameFilter>>,
    counter: IndexCounter,
    cancel: CancelToken,
}

impl Worker {
    pub fn new(
        rx: ChannelReceiver,
        indexer: Arc<dyn Indexer>,
        name_filter: Option<Arc<NameFilter>>,
        counter: IndexCounter,
        cancel: CancelToken,
    ) -> Self {
        Self {
            rx,
            indexer,
            name_filter,
            counter,
            cancel,
        }
    }

    /// Receive until a stop marker, cancellation, or disconnect. The stop marker is consumed
    /// here and never forwarded.
    pub fn run(&self) -> WorkerStats {
        let mut stats = WorkerStats::default();
        loop {
            let file = match self.rx.receive(&self.cancel) {
                Ok(WorkItem::File(file)) => file,
                Ok(WorkItem::Stop) => {
                    stats.got_stop = true;
                    break;
                }
                Err(ChannelError::Cancelled) => {
                    debug!("worker cancelled");
                    break;
                }
                Err(ChannelError::Disconnected) => {
                    debug!("channel closed without stop marker");
                    break;
                }
            };
            if let Some(filter) = &self.name_filter
                && !filter.matches(&file)
            {
                stats.filtered += 1;
                continue;
            }
            if self.index_one(&file) {
                stats.indexed += 1;
            } else {
                stats.failed += 1;
            }
        }
        stats
    }

    /// Run the indexer on one file, isolating errors and panics. The counter is bumped only
    /// when the indexer succeeds.
    fn index_one(&self, file: &FileRef) -> bool {
        match panic::catch_unwind(AssertUnwindSafe(|| self.indexer.index(file))) {
            Ok(Ok(())) => {
                self.counter.increment_and_get();
                true
            }
            Ok(Err(err)) => {
                warn!("failed to index {}: {:#}", file.path(), err);
                false
            }
            Err(payload) => {
                warn!(
                    "indexer panicked on {}: {}",
                    file.path(),
                    panic_message(payload.as_ref())
                );
                false
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic>"
    }
}

/// Spawn a named worker thread. The thread owns the worker and its receiver clone.
pub fn spawn_worker_thread(
    worker: Worker,
    index: usize,
) -> std::io::Result<JoinHandle<WorkerStats>> {
    thread::Builder::new()
        .name(format!("worker-{index}"))
        .spawn(move || {
            let stats = worker.run();
            debug!(
                "exit: {} indexed, {} failed, {} filtered",
                stats.indexed, stats.failed, stats.filtered
            );
            stats
        })
}
