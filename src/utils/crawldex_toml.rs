//! Load `.crawldex.toml` from a directory (CLI only). Lib does not use this; the consuming program injects config via PipelineOpts.

use serde::Deserialize;
use std::path::Path;

use crate::utils::config::PackagePaths;
use crate::{DedupPolicy, Opts, VisitedScope};

#[derive(Debug, Default, Deserialize)]
pub struct CrawldexToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsSection {
    capacity: Option<usize>,
    workers: Option<usize>,
    dedup: Option<bool>,
    shared_visited: Option<bool>,
    follow_links: Option<bool>,
    exclude: Option<Vec<String>>,
    name: Option<String>,
    glob: Option<String>,
    regex: Option<String>,
    list: Option<bool>,
    verbose: Option<bool>,
    progress: Option<bool>,
}

/// Load `.crawldex.toml` from `dir` if present. Returns None if file missing or unreadable.
pub fn load_crawldex_toml(dir: &Path) -> Option<CrawldexToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_crawldex_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

pub fn parse_crawldex_toml(s: &str) -> Result<CrawldexToml, toml::de::Error> {
    toml::from_str(s)
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $($opts_field:ident).+) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$($opts_field).+ = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Call before applying CLI.
/// An invalid `regex` in the file is logged and ignored.
pub fn apply_file_to_opts(file: &CrawldexToml, opts: &mut Opts) {
    let s = &file.settings;
    apply_file_opt!(s, opts, capacity => pipeline.capacity);
    apply_file_opt!(s, opts, workers => pipeline.workers);
    apply_file_opt!(s, opts, follow_links => pipeline.follow_links);
    apply_file_opt!(s, opts, list => list_paths);
    apply_file_opt!(s, opts, verbose => verbose);
    apply_file_opt!(s, opts, progress => progress);
    if let Some(dedup) = s.dedup {
        opts.pipeline.dedup = if dedup {
            DedupPolicy::Enabled
        } else {
            DedupPolicy::Disabled
        };
    }
    if let Some(shared) = s.shared_visited {
        opts.pipeline.visited_scope = if shared {
            VisitedScope::Shared
        } else {
            VisitedScope::PerCrawler
        };
    }
    if let Some(ref v) = s.exclude {
        opts.pipeline.exclude = v.clone();
    }
    match crate::pipeline::filter::NameFilter::from_parts(
        s.name.as_deref(),
        s.glob.as_deref(),
        s.regex.as_deref(),
    ) {
        Ok(Some(f)) => opts.pipeline.name_filter = Some(f),
        Ok(None) => {}
        Err(e) => log::warn!("{}: {}", PackagePaths::get().config_filename(), e),
    }
}
