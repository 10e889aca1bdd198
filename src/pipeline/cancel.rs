//! Per-task cancellation: a flag plus a channel whose disconnection wakes a blocked `select!`.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Cancellation signal for one task. Cloning shares the same signal.
///
/// The task side hands [`CancelToken::waker`] to `select!` next to its real channel operation;
/// [`CancelToken::cancel`] drops the only sender, so every waiting select wakes on the
/// disconnected receiver.
#[derive(Clone)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    waker: Receiver<()>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, rx) = bounded::<()>(0);
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            trigger: Arc::new(Mutex::new(Some(tx))),
            waker: rx,
        }
    }

    /// Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
        let sender = match self.trigger.lock() {
            Ok(mut g) => g.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        drop(sender);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Receiver that becomes ready (disconnected) once cancelled. Never yields a value.
    pub fn waker(&self) -> &Receiver<()> {
        &self.waker
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
