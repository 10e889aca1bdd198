//! Application configuration constants.
//! Tuning and defaults in one place.

use std::sync::OnceLock;

use crate::engine::tools::OS_JUNK_PATTERNS;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Names the CLI excludes in addition to user patterns: its own config file and OS junk.
    pub fn default_exclude_patterns(&self) -> Vec<String> {
        let mut patterns = vec![self.config_filename().to_string()];
        patterns.extend(OS_JUNK_PATTERNS.iter().map(|p| p.to_string()));
        patterns
    }
}

// ---- Worker threads ----

/// Worker pool limits.
/// Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon; the rest are const.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Minimum pool size.
    pub floor: usize,
    /// Hard cap on the pool size.
    pub max: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
            max: Self::MAX_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;
    pub const MAX_THREADS: usize = 256;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// One worker per available thread, clamped to `[floor, max]`.
    pub fn default_workers(&self) -> usize {
        self.all_threads.clamp(self.floor, self.max)
    }
}

// ---- Channel ----

pub struct ChannelConsts;

impl ChannelConsts {
    /// Default bounded channel capacity.
    pub const DEFAULT_CAPACITY: usize = 10;
}

// ---- Progress ----

pub struct ProgressConsts;

impl ProgressConsts {
    /// Indexed files between progress bar refreshes (reduce lock contention).
    pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 64;
}
