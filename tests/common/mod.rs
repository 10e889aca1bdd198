//! Shared fixtures: an in-memory directory tree standing in for the filesystem.

#![allow(dead_code)]

use crawldex::{DirLister, FileRef, PipelineOpts};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Directory path -> entries. Unknown directories list as empty (like an unreadable dir).
#[derive(Default)]
pub struct MockLister {
    dirs: HashMap<String, Vec<FileRef>>,
    pub list_calls: AtomicUsize,
}

impl MockLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file at `path`, creating parent directory entries up to `/`.
    pub fn file(mut self, path: &str) -> Self {
        self.insert(FileRef::file(path));
        self
    }

    pub fn files(mut self, paths: &[&str]) -> Self {
        for p in paths {
            self.insert(FileRef::file(*p));
        }
        self
    }

    /// Add an entry under `dir` without deriving its parent from the path, e.g. to make one
    /// path show up in two directories.
    pub fn entry_in(mut self, dir: &str, entry: FileRef) -> Self {
        self.dirs.entry(dir.to_string()).or_default().push(entry);
        self
    }

    fn insert(&mut self, entry: FileRef) {
        let Some(parent) = entry.as_path().parent() else {
            return;
        };
        let parent = parent.to_string_lossy().into_owned();
        let list = self.dirs.entry(parent.clone()).or_default();
        if list.contains(&entry) {
            return;
        }
        list.push(entry);
        if parent != "/" {
            self.insert(FileRef::dir(parent));
        }
    }
}

impl DirLister for MockLister {
    fn list_entries(&self, dir: &Path, accept: &dyn Fn(&FileRef) -> bool) -> Vec<FileRef> {
        self.list_calls.fetch_add(1, Ordering::Relaxed);
        self.dirs
            .get(dir.to_string_lossy().as_ref())
            .map(|entries| entries.iter().filter(|e| accept(e)).cloned().collect())
            .unwrap_or_default()
    }
}

/// `count` files spread over `dirs` subdirectories of `root`, plus one file at the top.
pub fn tree(root: &str, dirs: usize, count: usize) -> MockLister {
    let mut lister = MockLister::new();
    for i in 0..count {
        let path = if i == 0 || dirs == 0 {
            format!("{root}/top{i}.dat")
        } else {
            format!("{root}/d{}/sub/f{i}.dat", i % dirs)
        };
        lister = lister.file(&path);
    }
    lister
}

pub fn opts(workers: usize, capacity: usize) -> PipelineOpts {
    PipelineOpts {
        workers,
        capacity,
        ..PipelineOpts::default()
    }
}

/// Indexer that records every path it was given.
#[derive(Default)]
pub struct Recorder {
    pub seen: Mutex<Vec<String>>,
}

impl Recorder {
    pub fn paths(&self) -> Vec<String> {
        let mut v = self.seen.lock().unwrap().clone();
        v.sort();
        v
    }
}

impl crawldex::Indexer for Recorder {
    fn index(&self, file: &FileRef) -> anyhow::Result<()> {
        self.seen.lock().unwrap().push(file.path().to_string());
        Ok(())
    }
}
