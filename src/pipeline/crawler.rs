//! Producer side: depth-first crawl of one root, sending accepted files on the channel.

use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::pipeline::cancel::CancelToken;
use crate::pipeline::channel::ChannelSender;
use crate::pipeline::filter::AcceptFn;
use crate::pipeline::lister::DirLister;
use crate::pipeline::visited::VisitedSet;
use crate::{CrawlStats, FileRef, WorkItem};

/// One crawler per root. Never sends the end-of-work marker; that is the coordinator's job.
pub struct Crawler {
    tx: ChannelSender,
    accept: AcceptFn,
    lister: Arc<dyn DirLister>,
    visited: VisitedSet,
    cancel: CancelToken,
}

impl Crawler {
    /// `accept` should already let directories through (see
    /// [`crawl_predicate`](crate::pipeline::filter::crawl_predicate)).
    pub fn new(
        tx: ChannelSender,
        accept: AcceptFn,
        lister: Arc<dyn DirLister>,
        visited: VisitedSet,
        cancel: CancelToken,
    ) -> Self {
        Self {
            tx,
            accept,
            lister,
            visited,
            cancel,
        }
    }

    fn list(&self, dir: &Path) -> std::vec::IntoIter<FileRef> {
        self.lister.list_entries(dir, &*self.accept).into_iter()
    }

    /// Walk `root` depth-first in listing order. Directories are descended into and never sent,
    /// except one whose canonical path is already open on the current branch. Files are sent
    /// unless the visited set already holds them. Stops early (with
    /// `interrupted` set) when a send is cancelled or every receiver is gone.
    pub fn crawl(&self, root: &Path) -> CrawlStats {
        let mut stats = CrawlStats {
            dirs: 1,
            ..CrawlStats::default()
        };
        // One iterator per open directory, with that directory's canonical path; the top is the
        // directory being listed.
        let mut stack = vec![(self.list(root), root.to_string_lossy().into_owned())];

        while let Some((top, _)) = stack.last_mut() {
            let Some(entry) = top.next() else {
                stack.pop();
                continue;
            };
            if entry.is_dir() {
                if self.cancel.is_cancelled() {
                    stats.interrupted = true;
                    break;
                }
                // A directory already open above us means a link cycle.
                if stack.iter().any(|(_, open)| open == entry.canonical()) {
                    debug!("skipping directory cycle at {}", entry.path());
                    continue;
                }
                stats.dirs += 1;
                let children = self.list(entry.as_path());
                let canonical = entry.canonical().to_owned();
                stack.push((children, canonical));
                continue;
            }
            if self.visited.already_indexed(&entry) {
                stats.duplicates += 1;
                continue;
            }
            if let Err(err) = self.tx.send(WorkItem::File(entry), &self.cancel) {
                debug!("crawl of {} stopped: {}", root.display(), err);
                stats.interrupted = true;
                break;
            }
            stats.emitted += 1;
        }
        stats
    }
}

/// Spawn a named crawler thread for `root`. The thread owns the crawler (and its sender clone),
/// so the sender is released as soon as the crawl returns.
pub fn spawn_crawler_thread(
    crawler: Crawler,
    root: PathBuf,
    index: usize,
) -> std::io::Result<JoinHandle<CrawlStats>> {
    thread::Builder::new()
        .name(format!("crawler-{index}"))
        .spawn(move || {
            debug!("crawling {}", root.display());
            let stats = crawler.crawl(&root);
            debug!(
                "done {}: {} sent, {} duplicate, {} dirs",
                root.display(),
                stats.emitted,
                stats.duplicates,
                stats.dirs
            );
            stats
        })
}
