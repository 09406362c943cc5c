//! Command handler for the watch/ingest run.

use anyhow::{Context, Result};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::sink::{JsonErrorSink, JsonLinesSink};
use crate::types::IngestOpts;
use crate::utils::schema_toml::{ConfigFile, load_config};
use crate::utils::setup_logging;

/// Build opts: file settings first, CLI flags override.
fn build_opts(cli: &Cli, config: &ConfigFile) -> Result<IngestOpts> {
    let mut opts = IngestOpts::default();
    config.apply_to_opts(&mut opts)?;

    if let Some(ref pattern) = cli.pattern {
        opts.pattern = Some(pattern.clone());
    }
    if let Some(ms) = cli.interval {
        opts.scan_interval = Some(Duration::from_millis(ms));
    }
    if let Some(workers) = cli.workers {
        opts.num_workers = Some(workers);
    }
    if let Some(ref scheme) = cli.signature {
        opts.signature = scheme
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("--signature")?;
    }
    if let Some(recursive) = cli.recursive {
        opts.recursive = recursive;
    }
    if cli.no_dedupe == Some(true) {
        opts.prevent_duplicates = false;
    }
    if let Some(once) = cli.once {
        opts.once = once;
    }
    Ok(opts)
}

/// Handle the run: load config, wire sinks and Ctrl-C, ingest until stopped.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose.unwrap_or(false));

    let config_path = cli.config_path();
    let config = load_config(&config_path)?;
    let schema = config.schema()?;
    let mut opts = build_opts(cli, &config)?;

    let stop = Arc::new(AtomicBool::new(false));
    let stop_handler = Arc::clone(&stop);
    ctrlc::set_handler(move || {
        stop_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;
    opts.stop = Some(stop);

    let mut records = JsonLinesSink::new(io::stdout());
    let mut errors = JsonErrorSink::new(io::stderr());
    let summary = crate::ingest_dir(&cli.dir, schema, &opts, &mut records, &mut errors)?;

    log::info!(
        "{} file(s), {} record(s) published, {} line(s) failed",
        summary.files_dispatched,
        summary.records_published,
        summary.lines_failed
    );
    Ok(())
}
