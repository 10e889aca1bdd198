//! Engine module: CLI front end and shared helpers

pub mod arg_parser;
pub mod cli;
pub mod progress;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{build_opts, handle_run};
pub use tools::{
    OS_JUNK_PATTERNS, glob_match, paths_overlap, roots_overlap, should_include_in_crawl,
};
