use clap::Parser;
use std::path::PathBuf;

struct DefaultArgs;

impl DefaultArgs {
    pub const ROOT: &'static str = ".";
}

/// Crawl directories and index every file once through a bounded worker pipeline.
#[derive(Clone, Debug, Parser)]
#[command(name = "crawldex")]
#[command(about = "Crawl root directories and index each file once with a fixed worker pool.")]
pub struct Cli {
    /// Root directories to crawl (one crawler each). Default: current directory.
    #[arg(value_name = "ROOT", default_value = DefaultArgs::ROOT, num_args = 1..)]
    pub roots: Vec<PathBuf>,

    /// Worker threads. Default: available parallelism.
    #[arg(long, short = 'w', value_parser = clap::value_parser!(usize))]
    pub workers: Option<usize>,

    /// Bounded channel capacity.
    #[arg(long, short = 'c', value_parser = clap::value_parser!(usize))]
    pub capacity: Option<usize>,

    /// Emit every encountered path, even when already seen.
    #[arg(long)]
    pub no_dedup: bool,

    /// Share one visited set across all crawlers (automatic when roots overlap).
    #[arg(long)]
    pub shared_visited: bool,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Only index files with exactly this name.
    #[arg(long, conflicts_with_all = ["glob", "regex"])]
    pub name: Option<String>,

    /// Only index files whose name matches this glob (e.g. "*.txt").
    #[arg(long, conflicts_with = "regex")]
    pub glob: Option<String>,

    /// Only index files whose whole name matches this regex.
    #[arg(long)]
    pub regex: Option<String>,

    /// Log each indexed path.
    #[arg(long, short = 'l', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub list: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Show a running count of indexed files.
    #[arg(long, short = 'p', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub progress: Option<bool>,

    /// Print the final report as JSON.
    #[arg(long)]
    pub json: bool,
}
