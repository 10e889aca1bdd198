//! Crawldex: bounded producer/consumer pipeline that crawls root directories and indexes each
//! file once.

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{ChannelError, CrawlError};
pub use pipeline::{
    DirLister, FsLister, IndexCounter, Indexer, NameFilter, PipelineCanceller, PipelineHandle,
    start_pipeline,
};

use std::path::PathBuf;
use std::sync::Arc;

/// Result alias used by public crawldex API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Short form of [`start_pipeline`]: filesystem lister, default capacity, dedup on.
///
/// `accept` decides which files are sent to workers (directories are always descended into);
/// `name_filter`, when set, further restricts which of them get indexed. Returns without
/// blocking; call [`PipelineHandle::join`] for the final report.
///
/// ```ignore
/// let handle = crawldex::start_indexing(
///     &[PathBuf::from("/srv/docs")],
///     |_| true,
///     4,
///     Some(NameFilter::glob("*.md")),
///     |f: &crawldex::FileRef| -> anyhow::Result<()> {
///         println!("{}", f.path());
///         Ok(())
///     },
/// )?;
/// let report = handle.join()?;
/// ```
pub fn start_indexing<A, I>(
    roots: &[PathBuf],
    accept: A,
    workers: usize,
    name_filter: Option<NameFilter>,
    indexer: I,
) -> Result<PipelineHandle>
where
    A: Fn(&FileRef) -> bool + Send + Sync + 'static,
    I: Indexer + 'static,
{
    let opts = PipelineOpts {
        workers,
        name_filter,
        ..PipelineOpts::default()
    };
    let lister = Arc::new(FsLister::new(opts.follow_links));
    let handle = start_pipeline(roots, Arc::new(accept), &opts, Arc::new(indexer), lister)?;
    Ok(handle)
}
