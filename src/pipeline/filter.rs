//! Name filters applied by workers, and the crawl-side acceptance predicate.

use regex::Regex;
use std::fmt;
use std::sync::Arc;

use crate::FileRef;
use crate::engine::tools::{glob_match, should_include_in_crawl};
use crate::error::CrawlError;

/// Which files a worker indexes. Exactly one rule applies; there is no fallback between kinds.
#[derive(Clone)]
pub enum NameFilter {
    /// Name equals the string.
    Exact(String),
    /// Name matches a glob (`*`, `?`), e.g. `*.txt`.
    Glob(String),
    /// Name fully matches the regex (anchored at both ends).
    Regex(Regex),
}

impl NameFilter {
    pub fn exact(name: impl Into<String>) -> Self {
        NameFilter::Exact(name.into())
    }

    pub fn glob(pattern: impl Into<String>) -> Self {
        NameFilter::Glob(pattern.into())
    }

    /// Compile `pattern` anchored, so `a.txt` does not match `ba.txt`.
    pub fn regex(pattern: &str) -> Result<Self, CrawlError> {
        Regex::new(&format!("^(?:{pattern})$"))
            .map(NameFilter::Regex)
            .map_err(|e| CrawlError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
    }

    /// Build from optional exact / glob / regex settings. At most one may be set.
    pub fn from_parts(
        name: Option<&str>,
        glob: Option<&str>,
        regex: Option<&str>,
    ) -> Result<Option<Self>, CrawlError> {
        match (name, glob, regex) {
            (None, None, None) => Ok(None),
            (Some(n), None, None) => Ok(Some(Self::exact(n))),
            (None, Some(g), None) => Ok(Some(Self::glob(g))),
            (None, None, Some(r)) => Self::regex(r).map(Some),
            _ => Err(CrawlError::ConflictingNameFilters),
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        match self {
            NameFilter::Exact(s) => name == s,
            NameFilter::Glob(p) => glob_match(p, name),
            NameFilter::Regex(re) => re.is_match(name),
        }
    }

    pub fn matches(&self, file: &FileRef) -> bool {
        self.matches_name(file.name())
    }
}

impl fmt::Debug for NameFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameFilter::Exact(s) => write!(f, "Exact({s:?})"),
            NameFilter::Glob(p) => write!(f, "Glob({p:?})"),
            NameFilter::Regex(re) => write!(f, "Regex({:?})", re.as_str()),
        }
    }
}

/// Crawl-side acceptance predicate over entries.
pub type AcceptFn = Arc<dyn Fn(&FileRef) -> bool + Send + Sync>;

/// Predicate that accepts everything.
pub fn accept_all() -> AcceptFn {
    Arc::new(|_: &FileRef| true)
}

/// Wrap a caller predicate for crawling: entries matching an `exclude` pattern never pass,
/// other directories always pass (so traversal is not filtered out), files pass when `accept`
/// says so. Nothing else is filtered here.
pub fn crawl_predicate(accept: AcceptFn, exclude: Vec<String>) -> AcceptFn {
    Arc::new(move |f: &FileRef| {
        if !should_include_in_crawl(f.as_path(), &exclude) {
            return false;
        }
        f.is_dir() || accept(f)
    })
}
