//! CLI command handler: build options (file, then flags), run the pipeline, report.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::engine::arg_parser::Cli;
use crate::engine::progress::{
    ProgressBar, create_counter, finish_progress, report_progress_batched,
};
use crate::pipeline::{FsLister, NameFilter, accept_all, start_pipeline};
use crate::utils::config::{PackagePaths, ProgressConsts};
use crate::utils::{apply_file_to_opts, load_crawldex_toml, setup_logging};
use crate::{DedupPolicy, FileRef, Opts, PipelineReport, VisitedScope};

/// Defaults, then `.crawldex.toml` from the working directory, then CLI flags. The config file
/// itself and OS junk are always appended to the exclude list.
pub fn build_opts(cli: &Cli, config_dir: &Path) -> Result<Opts> {
    let mut opts = Opts::default();
    if let Some(file) = load_crawldex_toml(config_dir) {
        apply_file_to_opts(&file, &mut opts);
    }
    apply_cli_to_opts(cli, &mut opts)?;
    opts.pipeline
        .exclude
        .extend(PackagePaths::get().default_exclude_patterns());
    Ok(opts)
}

fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) -> Result<()> {
    let p = &mut opts.pipeline;
    if let Some(w) = cli.workers {
        p.workers = w;
    }
    if let Some(c) = cli.capacity {
        p.capacity = c;
    }
    if cli.no_dedup {
        p.dedup = DedupPolicy::Disabled;
    }
    if cli.shared_visited {
        p.visited_scope = VisitedScope::Shared;
    }
    if let Some(f) = cli.follow_links {
        p.follow_links = f;
    }
    if !cli.exclude.is_empty() {
        p.exclude = cli.exclude.clone();
    }
    if let Some(filter) = NameFilter::from_parts(
        cli.name.as_deref(),
        cli.glob.as_deref(),
        cli.regex.as_deref(),
    )? {
        p.name_filter = Some(filter);
    }
    if let Some(v) = cli.list {
        opts.list_paths = v;
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if let Some(v) = cli.progress {
        opts.progress = v;
    }
    opts.json = cli.json;
    Ok(())
}

/// The CLI's indexer: stat each file, add its size to a running total.
fn size_indexer(
    total_bytes: Arc<AtomicU64>,
    list_paths: bool,
    bar: Option<ProgressBar>,
) -> impl Fn(&FileRef) -> Result<()> + Send + Sync + 'static {
    let seen = AtomicUsize::new(0);
    move |file: &FileRef| -> Result<()> {
        let meta = std::fs::metadata(file.as_path())
            .with_context(|| format!("stat {}", file.path()))?;
        total_bytes.fetch_add(meta.len(), Ordering::Relaxed);
        if list_paths {
            info!("{}", file.path());
        }
        let n = seen.fetch_add(1, Ordering::Relaxed) + 1;
        report_progress_batched(bar.as_ref(), n, ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE);
        Ok(())
    }
}

fn print_report(report: &PipelineReport, total_bytes: u64, json: bool) -> Result<()> {
    if json {
        let mut value = serde_json::to_value(report).context("serialize report")?;
        value["bytes"] = serde_json::Value::from(total_bytes);
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }
    info!(
        "indexed {} files ({} bytes) from {} dirs",
        report.indexed, total_bytes, report.dirs
    );
    if report.duplicates > 0 {
        info!("skipped {} duplicate paths", report.duplicates);
    }
    if report.filtered > 0 {
        info!("{} files did not match the name filter", report.filtered);
    }
    if report.failed > 0 {
        warn!("{} files failed to index", report.failed);
    }
    debug!(
        "{} workers, capacity {}, peak occupancy {}, {} stop markers",
        report.workers, report.capacity, report.peak_occupancy, report.sentinels_sent
    );
    debug!(
        "channel: {} sent, {} received",
        report.channel_sent, report.channel_received
    );
    Ok(())
}

/// Run the pipeline over `cli.roots` and print a summary. Ctrl+C cancels every task.
pub fn handle_run(cli: &Cli) -> Result<PipelineReport> {
    let cwd = std::env::current_dir().context("read current directory")?;
    let opts = build_opts(cli, &cwd)?;
    setup_logging(opts.verbose);
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        opts
    );

    let total_bytes = Arc::new(AtomicU64::new(0));
    let bar = opts.progress.then(|| create_counter("Indexing"));
    let indexer = size_indexer(Arc::clone(&total_bytes), opts.list_paths, bar.clone());

    let handle = start_pipeline(
        &cli.roots,
        accept_all(),
        &opts.pipeline,
        Arc::new(indexer),
        Arc::new(FsLister::new(opts.pipeline.follow_links)),
    )?;

    let canceller = handle.canceller();
    ctrlc::set_handler(move || canceller.cancel()).context("set Ctrl+C handler")?;

    let report = handle.join()?;
    finish_progress(bar.as_ref(), report.indexed);
    print_report(&report, total_bytes.load(Ordering::Relaxed), opts.json)?;

    if report.cancelled {
        anyhow::bail!(
            "Indexing cancelled by user after {} files",
            report.indexed
        );
    }
    Ok(report)
}
