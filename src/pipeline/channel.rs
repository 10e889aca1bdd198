//! Bounded FIFO handoff between crawlers and workers.
//!
//! Thin layer over `crossbeam_channel::bounded` that adds per-task cancellation of blocked
//! operations and occupancy instrumentation. The channel itself never drops or duplicates an
//! item: every successful `send` is matched by exactly one successful `receive`.

use crossbeam_channel::{Receiver, Select, Sender, TryRecvError, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::WorkItem;
use crate::error::{ChannelError, CrawlError};
use crate::pipeline::cancel::CancelToken;

/// Counters shared by every handle of one channel.
#[derive(Debug, Default)]
pub struct ChannelStats {
    /// Items successfully enqueued (sentinels included).
    pub sent: AtomicU64,
    /// Items successfully dequeued.
    pub received: AtomicU64,
    /// Highest queue length observed right after a send.
    pub peak_occupancy: AtomicUsize,
}

impl ChannelStats {
    pub fn sent(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }

    pub fn received(&self) -> u64 {
        self.received.load(Ordering::Relaxed)
    }

    pub fn peak_occupancy(&self) -> usize {
        self.peak_occupancy.load(Ordering::Relaxed)
    }
}

/// A fixed-capacity channel. Split it into handles and drop it; the pipeline relies on
/// disconnection once every handle of one side is gone.
pub struct BoundedChannel {
    sender: Sender<WorkItem>,
    receiver: Receiver<WorkItem>,
    capacity: usize,
    stats: Arc<ChannelStats>,
}

impl BoundedChannel {
    pub fn new(capacity: usize) -> Result<Self, CrawlError> {
        if capacity == 0 {
            return Err(CrawlError::ZeroCapacity);
        }
        let (sender, receiver) = bounded(capacity);
        Ok(Self {
            sender,
            receiver,
            capacity,
            stats: Arc::new(ChannelStats::default()),
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> Arc<ChannelStats> {
        Arc::clone(&self.stats)
    }

    /// Consume the channel into one send handle and one receive handle. Clone them per task.
    pub fn split(self) -> (ChannelSender, ChannelReceiver) {
        let tx = ChannelSender {
            sender: self.sender,
            capacity: self.capacity,
            stats: Arc::clone(&self.stats),
        };
        let rx = ChannelReceiver {
            receiver: self.receiver,
            stats: self.stats,
        };
        (tx, rx)
    }
}

#[derive(Clone)]
pub struct ChannelSender {
    sender: Sender<WorkItem>,
    capacity: usize,
    stats: Arc<ChannelStats>,
}

impl ChannelSender {
    /// Block until a slot is free, then enqueue.
    ///
    /// Returns `Cancelled` (item not enqueued) if `cancel` fires first, `Disconnected` if every
    /// receiver is gone.
    pub fn send(&self, item: WorkItem, cancel: &CancelToken) -> Result<(), ChannelError> {
        if cancel.is_cancelled() {
            return Err(ChannelError::Cancelled);
        }
        let mut sel = Select::new();
        let send_op = sel.send(&self.sender);
        let cancel_op = sel.recv(cancel.waker());
        let oper = sel.select();
        match oper.index() {
            i if i == send_op => {
                oper.send(&self.sender, item)
                    .map_err(|_| ChannelError::Disconnected)?;
                self.record_send();
                Ok(())
            }
            i if i == cancel_op => {
                let _ = oper.recv(cancel.waker());
                Err(ChannelError::Cancelled)
            }
            _ => unreachable!(),
        }
    }

    fn record_send(&self) {
        self.stats.sent.fetch_add(1, Ordering::Relaxed);
        self.stats
            .peak_occupancy
            .fetch_max(self.sender.len(), Ordering::Relaxed);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Items currently queued (snapshot).
    pub fn len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sender.is_empty()
    }
}

#[derive(Clone)]
pub struct ChannelReceiver {
    receiver: Receiver<WorkItem>,
    stats: Arc<ChannelStats>,
}

impl ChannelReceiver {
    /// Block until an item is available, then dequeue it.
    ///
    /// Returns `Cancelled` (nothing dequeued) if `cancel` fires first, `Disconnected` once every
    /// sender is gone and the queue is drained.
    pub fn receive(&self, cancel: &CancelToken) -> Result<WorkItem, ChannelError> {
        if cancel.is_cancelled() {
            return Err(ChannelError::Cancelled);
        }
        let mut sel = Select::new();
        let recv_op = sel.recv(&self.receiver);
        let cancel_op = sel.recv(cancel.waker());
        let oper = sel.select();
        match oper.index() {
            i if i == recv_op => {
                let item = oper
                    .recv(&self.receiver)
                    .map_err(|_| ChannelError::Disconnected)?;
                self.stats.received.fetch_add(1, Ordering::Relaxed);
                Ok(item)
            }
            i if i == cancel_op => {
                let _ = oper.recv(cancel.waker());
                Err(ChannelError::Cancelled)
            }
            _ => unreachable!(),
        }
    }

    /// Non-blocking receive. `Ok(None)` when the queue is empty but senders remain.
    pub fn try_receive(&self) -> Result<Option<WorkItem>, ChannelError> {
        match self.receiver.try_recv() {
            Ok(item) => {
                self.stats.received.fetch_add(1, Ordering::Relaxed);
                Ok(Some(item))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ChannelError::Disconnected),
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
