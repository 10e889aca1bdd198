//! Directory listing: one level at a time, filtered by the crawl predicate.

use log::{debug, warn};
use std::path::Path;
use walkdir::WalkDir;

use crate::FileRef;

/// Lists the immediate entries of a directory. Errors are not surfaced: an unreadable or
/// missing directory yields no entries so one bad directory never aborts a crawl.
pub trait DirLister: Send + Sync {
    fn list_entries(&self, dir: &Path, accept: &dyn Fn(&FileRef) -> bool) -> Vec<FileRef>;
}

/// Real filesystem lister backed by `walkdir` with depth fixed to 1. Entries come back sorted by
/// file name, so a crawl over an unchanged tree is deterministic.
///
/// Entries carry their canonical path for dedup. Without `follow_links`, symlinks to
/// directories are skipped; symlinks to files are listed as files.
#[derive(Clone, Debug, Default)]
pub struct FsLister {
    follow_links: bool,
}

impl FsLister {
    pub fn new(follow_links: bool) -> Self {
        Self { follow_links }
    }

    /// With `follow_links`, a symlinked directory pointing at `dir` or one of its ancestors would
    /// make the crawl endless.
    fn is_link_loop(&self, dir: &Path, entry: &walkdir::DirEntry) -> bool {
        if !self.follow_links || !entry.path_is_symlink() {
            return false;
        }
        match (dir.canonicalize(), entry.path().canonicalize()) {
            (Ok(here), Ok(target)) => here.starts_with(&target),
            _ => false,
        }
    }
}

impl DirLister for FsLister {
    fn list_entries(&self, dir: &Path, accept: &dyn Fn(&FileRef) -> bool) -> Vec<FileRef> {
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.follow_links)
            .sort_by_file_name();

        let mut out = Vec::new();
        for res in walker {
            let entry = match res {
                Ok(entry) => entry,
                Err(err) => {
                    let at = err
                        .path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| dir.display().to_string());
                    warn!("skipping {}: {}", at, err);
                    continue;
                }
            };
            if !self.follow_links && entry.path_is_symlink() && entry.path().is_dir() {
                debug!("not following directory link {}", entry.path().display());
                continue;
            }
            let is_dir = entry.file_type().is_dir();
            if is_dir && self.is_link_loop(dir, &entry) {
                debug!("not following link loop at {}", entry.path().display());
                continue;
            }
            let mut file = FileRef::from_path(entry.path(), is_dir);
            // Below a canonical root only links can make the listed path differ.
            if (self.follow_links || entry.path_is_symlink())
                && let Ok(canonical) = entry.path().canonicalize()
            {
                file = file.with_canonical(canonical.to_string_lossy());
            }
            if accept(&file) {
                out.push(file);
            }
        }
        out
    }
}
