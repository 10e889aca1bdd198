//! Path and filter utilities

use std::path::{Path, PathBuf};

/// OS-specific junk names, as glob patterns for the exclude list
pub const OS_JUNK_PATTERNS: &[&str] = &[
    // macOS
    ".DS_Store",
    ".AppleDouble",
    ".LSOverride",
    "._*",
    // Windows
    "Thumbs.db",
    "ehthumbs.db",
    "Desktop.ini",
    "$RECYCLE.BIN",
    // Linux
    ".directory",
    ".Trash-*",
];

/// Returns true if the entry should be considered by a crawl (not excluded).
/// Patterns are tried against the entry name and the full path.
pub fn should_include_in_crawl(path: &Path, exclude_patterns: &[String]) -> bool {
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    if exclude_patterns.is_empty() {
        return true;
    }
    let path_str = path.to_str().unwrap_or("");
    !exclude_patterns
        .iter()
        .any(|pattern| glob_match(pattern, name) || glob_match(pattern, path_str))
}

/// Glob matching over the whole text (supports `*` and `?`). A leading `!` is ignored.
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern = pattern.strip_prefix('!').unwrap_or(pattern);
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0, 0);
    // Position of the last `*` and the text index it is currently absorbing up to.
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        match p.get(pi) {
            Some('*') => {
                star = Some((pi, ti));
                pi += 1;
            }
            Some('?') => {
                pi += 1;
                ti += 1;
            }
            Some(&c) if c == t[ti] => {
                pi += 1;
                ti += 1;
            }
            _ => match star {
                Some((sp, st)) => {
                    pi = sp + 1;
                    ti = st + 1;
                    star = Some((sp, st + 1));
                }
                None => return false,
            },
        }
    }
    p[pi..].iter().all(|&c| c == '*')
}

/// True when `a` and `b` are the same directory or one contains the other.
pub fn paths_overlap(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}

/// Canonicalize if possible, otherwise keep the path as given (e.g. a root that does not exist).
pub fn canonicalize_or_keep(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// True if any two roots overlap after canonicalization.
pub fn roots_overlap(roots: &[PathBuf]) -> bool {
    let canon: Vec<PathBuf> = roots.iter().map(|r| canonicalize_or_keep(r)).collect();
    canon
        .iter()
        .enumerate()
        .any(|(i, a)| canon[i + 1..].iter().any(|b| paths_overlap(a, b)))
}
