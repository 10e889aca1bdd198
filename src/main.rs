//! Crawldex CLI: crawl root directories and index every file once.

use anyhow::Result;
use clap::Parser;
use crawldex::engine::arg_parser::Cli;
use crawldex::engine::handle_run;
use std::time::Instant;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
