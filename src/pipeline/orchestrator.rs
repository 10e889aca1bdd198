use log::debug;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::engine::tools::{canonicalize_or_keep, roots_overlap};
use crate::error::CrawlError;
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::channel::BoundedChannel;
use crate::pipeline::context::{PipelineCanceller, PipelineHandle};
use crate::pipeline::counter::IndexCounter;
use crate::pipeline::crawler::{Crawler, spawn_crawler_thread};
use crate::pipeline::filter::{AcceptFn, crawl_predicate};
use crate::pipeline::lister::DirLister;
use crate::pipeline::shutdown::{ShutdownCoordinator, spawn_coordinator_thread};
use crate::pipeline::visited::VisitedSet;
use crate::pipeline::worker::{Indexer, Worker, spawn_worker_thread};
use crate::{CrawlStats, PipelineOpts, VisitedScope, WorkerStats};

/// Resolve `Auto` against the actual roots.
pub fn resolve_visited_scope(scope: VisitedScope, roots: &[PathBuf]) -> VisitedScope {
    match scope {
        VisitedScope::Auto if roots_overlap(roots) => VisitedScope::Shared,
        VisitedScope::Auto => VisitedScope::PerCrawler,
        other => other,
    }
}

/// Start one crawler per root, `opts.workers` workers, and the shutdown coordinator, all sharing
/// one bounded channel. Returns immediately.
///
/// Roots are canonicalized when possible. A root that cannot be listed contributes no files.
/// With no roots at all the workers are stopped straight away.
pub fn start_pipeline(
    roots: &[PathBuf],
    accept: AcceptFn,
    opts: &PipelineOpts,
    indexer: Arc<dyn Indexer>,
    lister: Arc<dyn DirLister>,
) -> Result<PipelineHandle, CrawlError> {
    if opts.workers == 0 {
        return Err(CrawlError::ZeroWorkers);
    }
    let channel = BoundedChannel::new(opts.capacity)?;
    let capacity = channel.capacity();
    let channel_stats = channel.stats();
    let (tx, rx) = channel.split();

    let roots: Vec<PathBuf> = roots.iter().map(|r| canonicalize_or_keep(r)).collect();
    let scope = resolve_visited_scope(opts.visited_scope, &roots);
    debug!(
        "starting pipeline: {} roots, {} workers, capacity {}, {:?} dedup, {:?} visited set",
        roots.len(),
        opts.workers,
        capacity,
        opts.dedup,
        scope
    );

    let accept = crawl_predicate(accept, opts.exclude.clone());

    let counter = IndexCounter::new();
    let name_filter = opts.name_filter.clone().map(Arc::new);
    let mut tokens: Vec<CancelToken> = Vec::with_capacity(roots.len() + opts.workers + 1);
    // On a failed spawn, stop whatever already runs.
    let abort = |tokens: &[CancelToken], role: &'static str, source: std::io::Error| {
        PipelineCanceller::new(tokens.to_vec()).cancel();
        CrawlError::Spawn { role, source }
    };

    let mut workers: Vec<JoinHandle<WorkerStats>> = Vec::with_capacity(opts.workers);
    for i in 0..opts.workers {
        let cancel = CancelToken::new();
        tokens.push(cancel.clone());
        let worker = Worker::new(
            rx.clone(),
            Arc::clone(&indexer),
            name_filter.clone(),
            counter.clone(),
            cancel,
        );
        let handle = spawn_worker_thread(worker, i).map_err(|e| abort(&tokens, "worker", e))?;
        workers.push(handle);
    }
    drop(rx);

    let shared_visited = VisitedSet::new(opts.dedup);
    let mut crawlers: Vec<JoinHandle<CrawlStats>> = Vec::with_capacity(roots.len());
    for (i, root) in roots.into_iter().enumerate() {
        let cancel = CancelToken::new();
        tokens.push(cancel.clone());
        let visited = match scope {
            VisitedScope::Shared => shared_visited.clone(),
            _ => VisitedSet::new(opts.dedup),
        };
        let crawler = Crawler::new(
            tx.clone(),
            Arc::clone(&accept),
            Arc::clone(&lister),
            visited,
            cancel,
        );
        let handle =
            spawn_crawler_thread(crawler, root, i).map_err(|e| abort(&tokens, "crawler", e))?;
        crawlers.push(handle);
    }

    let cancel = CancelToken::new();
    tokens.push(cancel.clone());
    let coordinator = ShutdownCoordinator::new(tx, opts.workers, cancel);
    let coordinator = spawn_coordinator_thread(coordinator, crawlers)
        .map_err(|e| abort(&tokens, "shutdown", e))?;

    Ok(PipelineHandle {
        coordinator,
        workers,
        counter,
        channel_stats,
        canceller: PipelineCanceller::new(tokens),
        worker_count: opts.workers,
        capacity,
    })
}
