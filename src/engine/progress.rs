//! Progress counter for the CLI indexer

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )))
}

/// Update progress bar if available
/// Uses try_lock so workers never wait on the bar; a skipped update is caught up by the next one
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update_to(n);
    }
}

/// Report `count` (the shared counter value) every `chunk_size` files.
pub fn report_progress_batched(pb: Option<&ProgressBar>, count: usize, chunk_size: usize) {
    if let Some(pb) = pb
        && count.is_multiple_of(chunk_size)
    {
        update_progress_bar(pb, count);
    }
}

/// Final update once the pipeline is joined; blocks on the lock so it is never skipped.
pub fn finish_progress(pb: Option<&ProgressBar>, total: usize) {
    if let Some(pb) = pb {
        let mut bar = match pb.lock() {
            Ok(b) => b,
            Err(poisoned) => poisoned.into_inner(),
        };
        let _ = bar.update_to(total);
        let _ = bar.refresh();
        eprintln!();
    }
}
