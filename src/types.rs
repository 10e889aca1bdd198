//! Public and internal types for the crawldex API and pipeline.

use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::pipeline::filter::NameFilter;
use crate::utils::config::{ChannelConsts, WorkerThreadLimits};

/// A filesystem entry seen by a crawler. Keeps the path as listed and, when it differs, the
/// canonical path it resolves to.
///
/// Equality and hashing use the canonical path only, so a file reached through a symlinked
/// directory equals the same file reached directly. Without an explicit canonical path the
/// listed path is its own identity.
#[derive(Clone, Debug)]
pub struct FileRef {
    path: String,
    canonical: Option<String>,
    is_dir: bool,
}

impl FileRef {
    pub fn new(path: impl Into<String>, is_dir: bool) -> Self {
        Self {
            path: path.into(),
            canonical: None,
            is_dir,
        }
    }

    /// Attach the resolved path this entry stands for.
    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        let canonical = canonical.into();
        self.canonical = (canonical != self.path).then_some(canonical);
        self
    }

    pub fn file(path: impl Into<String>) -> Self {
        Self::new(path, false)
    }

    pub fn dir(path: impl Into<String>) -> Self {
        Self::new(path, true)
    }

    /// Build from a real path. Non-UTF-8 components are replaced lossily.
    pub fn from_path(path: &Path, is_dir: bool) -> Self {
        Self::new(path.to_string_lossy().into_owned(), is_dir)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Identity used for equality and dedup.
    pub fn canonical(&self) -> &str {
        self.canonical.as_deref().unwrap_or(&self.path)
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.path)
    }

    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Final path component, or the whole path when it has none (e.g. `/`).
    pub fn name(&self) -> &str {
        self.as_path()
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.path)
    }
}

impl PartialEq for FileRef {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for FileRef {}

impl Hash for FileRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

/// What travels through the bounded channel. `Stop` is the end-of-work marker: one per worker,
/// sent only by the shutdown coordinator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorkItem {
    File(FileRef),
    Stop,
}

impl WorkItem {
    pub fn is_stop(&self) -> bool {
        matches!(self, WorkItem::Stop)
    }
}

/// Whether a crawler suppresses paths it has already emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum DedupPolicy {
    #[default]
    Enabled,
    /// Every encountered file is emitted, even when reached twice (e.g. via a symlinked tree).
    Disabled,
}

/// Who owns the visited set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum VisitedScope {
    /// Shared when two roots overlap (equal, or one contains the other), per crawler otherwise.
    #[default]
    Auto,
    PerCrawler,
    Shared,
}

/// Options for [`start_pipeline`](crate::pipeline::start_pipeline).
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Bounded channel capacity. Must be at least 1.
    pub capacity: usize,
    /// Number of worker threads (and sentinels). Must be at least 1.
    pub workers: usize,
    pub dedup: DedupPolicy,
    pub visited_scope: VisitedScope,
    /// Follow symbolic links while listing (filesystem lister only).
    pub follow_links: bool,
    /// Exclude patterns (glob syntax), matched on entry name or full path.
    pub exclude: Vec<String>,
    /// When set, workers only index files whose name matches.
    pub name_filter: Option<NameFilter>,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            capacity: ChannelConsts::DEFAULT_CAPACITY,
            workers: WorkerThreadLimits::current().default_workers(),
            dedup: DedupPolicy::default(),
            visited_scope: VisitedScope::default(),
            follow_links: false,
            exclude: Vec::new(),
            name_filter: None,
        }
    }
}

/// Full options (CLI). Use [`PipelineOpts`] for lib.
#[derive(Clone, Debug, Default)]
pub struct Opts {
    pub pipeline: PipelineOpts,
    /// Log each indexed path at info level.
    pub list_paths: bool,
    /// Show a running counter of indexed files.
    pub progress: bool,
    pub verbose: bool,
    /// Print the final report as JSON on stdout.
    pub json: bool,
}

/// Per-crawler totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CrawlStats {
    /// Files sent on the channel.
    pub emitted: usize,
    /// Files skipped because the visited set already held them.
    pub duplicates: usize,
    /// Directories descended into (root included).
    pub dirs: usize,
    /// The crawl stopped early because its send was cancelled or the channel closed.
    pub interrupted: bool,
}

impl CrawlStats {
    pub fn merge(&mut self, other: &CrawlStats) {
        self.emitted += other.emitted;
        self.duplicates += other.duplicates;
        self.dirs += other.dirs;
        self.interrupted |= other.interrupted;
    }
}

/// Per-worker totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WorkerStats {
    pub indexed: usize,
    /// Indexer returned an error or panicked.
    pub failed: usize,
    /// Name filter did not match.
    pub filtered: usize,
    /// The worker consumed a sentinel (as opposed to cancel or disconnect).
    pub got_stop: bool,
}

impl WorkerStats {
    pub fn merge(&mut self, other: &WorkerStats) {
        self.indexed += other.indexed;
        self.failed += other.failed;
        self.filtered += other.filtered;
    }
}

/// Result of a completed run, returned by [`PipelineHandle::join`](crate::pipeline::PipelineHandle::join).
#[derive(Clone, Debug, Default, Serialize)]
pub struct PipelineReport {
    /// Final counter value.
    pub indexed: usize,
    pub failed: usize,
    pub filtered: usize,
    pub emitted: usize,
    pub duplicates: usize,
    pub dirs: usize,
    pub workers: usize,
    pub capacity: usize,
    pub peak_occupancy: usize,
    /// Items enqueued on the channel, stop markers included.
    pub channel_sent: u64,
    /// Items dequeued from the channel.
    pub channel_received: u64,
    pub sentinels_sent: usize,
    /// Workers that stopped on a sentinel.
    pub workers_stopped: usize,
    /// Crawler threads that panicked.
    pub crawler_panics: usize,
    pub cancelled: bool,
}
