pub mod config;
pub mod crawldex_toml;
pub mod logger;

pub use config::*;
pub use crawldex_toml::{apply_file_to_opts, load_crawldex_toml};
pub use logger::setup_logging;
