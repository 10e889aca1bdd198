//! Dedup state for crawlers: the set of canonical paths already emitted.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::{DedupPolicy, FileRef};

/// Mutex-guarded set of canonical path strings (see [`FileRef::canonical`]).
///
/// Cloning shares the underlying set; a crawler normally gets a [`VisitedSet::new`] of its own
/// and only overlapping roots share one. With [`DedupPolicy::Disabled`] nothing is recorded and
/// every path is reported as new.
#[derive(Clone, Debug)]
pub struct VisitedSet {
    seen: Arc<Mutex<HashSet<String>>>,
    policy: DedupPolicy,
}

impl VisitedSet {
    pub fn new(policy: DedupPolicy) -> Self {
        Self {
            seen: Arc::new(Mutex::new(HashSet::new())),
            policy,
        }
    }

    /// True if `file` was seen before; otherwise records it and returns false.
    /// Check and insert happen under one lock, so two crawlers sharing the set cannot both
    /// claim the same path.
    pub fn already_indexed(&self, file: &FileRef) -> bool {
        if self.policy == DedupPolicy::Disabled {
            return false;
        }
        let mut seen = match self.seen.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        !seen.insert(file.canonical().to_owned())
    }

    pub fn contains(&self, file: &FileRef) -> bool {
        match self.seen.lock() {
            Ok(g) => g.contains(file.canonical()),
            Err(poisoned) => poisoned.into_inner().contains(file.canonical()),
        }
    }

    pub fn len(&self) -> usize {
        match self.seen.lock() {
            Ok(g) => g.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_on_first_sight() {
        let set = VisitedSet::new(DedupPolicy::Enabled);
        let f = FileRef::file("/r/a.txt");
        assert!(!set.already_indexed(&f));
        assert!(set.already_indexed(&f));
        assert!(set.already_indexed(&FileRef::file("/r/a.txt")));
        assert!(!set.already_indexed(&FileRef::file("/r/b.txt")));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn disabled_never_reports_seen() {
        let set = VisitedSet::new(DedupPolicy::Disabled);
        let f = FileRef::file("/r/a.txt");
        assert!(!set.already_indexed(&f));
        assert!(!set.already_indexed(&f));
        assert!(set.is_empty());
    }

    #[test]
    fn aliases_share_one_entry() {
        let set = VisitedSet::new(DedupPolicy::Enabled);
        let direct = FileRef::file("/r/docs/x");
        let alias = FileRef::file("/r/alias/x").with_canonical("/r/docs/x");
        assert!(!set.already_indexed(&direct));
        assert!(set.already_indexed(&alias));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let a = VisitedSet::new(DedupPolicy::Enabled);
        let b = a.clone();
        assert!(!a.already_indexed(&FileRef::file("x")));
        assert!(b.already_indexed(&FileRef::file("x")));
        assert!(b.contains(&FileRef::file("x")));
    }
}
