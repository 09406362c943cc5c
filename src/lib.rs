//! Linetap: directory-watching record ingester. Polls a drop directory,
//! splits each discovered file into lines, decodes every line against a
//! typed delimiter-separated schema, and routes records and failures to two
//! separate sinks.

pub mod decode;
pub mod engine;
pub mod errors;
pub mod pipeline;
pub mod schema;
pub mod sink;
pub mod split;
pub mod types;
pub mod utils;
pub mod watch;

/// Re-export types for API
pub use types::*;

use log::debug;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::pipeline::{
    PipelineHandles, deliver_outcomes, report_scan_failures, run_pipeline, shutdown_pipeline,
};
use crate::schema::RecordSchema;
use crate::sink::{ErrorSink, RecordSink};
use crate::watch::DuplicateFilter;

/// Result alias used by public linetap API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point: watch `dir` with `opts`, decode every discovered file
/// against `schema`, and drive the two sinks until the run stops.
///
/// - **`opts.once`** → scan one time, drain every dispatched file, return.
/// - Otherwise the watcher re-scans every `opts.scan_interval` until
///   `opts.stop` is raised (the CLI wires Ctrl-C to it).
///
/// The duplicate filter's seen-set lives for the duration of this call; use
/// [`ingest_dir_with_filter`] to own it across calls (or inject a fresh one
/// per test).
pub fn ingest_dir(
    dir: &Path,
    schema: RecordSchema,
    opts: &IngestOpts,
    record_sink: &mut dyn RecordSink,
    error_sink: &mut dyn ErrorSink,
) -> Result<IngestSummary> {
    let filter = Arc::new(Mutex::new(DuplicateFilter::new()));
    ingest_dir_with_filter(dir, schema, opts, filter, record_sink, error_sink)
}

/// [`ingest_dir`] with an injected seen-set, for callers that keep duplicate
/// state across runs or isolate it per test.
pub fn ingest_dir_with_filter(
    dir: &Path,
    schema: RecordSchema,
    opts: &IngestOpts,
    filter: Arc<Mutex<DuplicateFilter>>,
    record_sink: &mut dyn RecordSink,
    error_sink: &mut dyn ErrorSink,
) -> Result<IngestSummary> {
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);

    let schema = Arc::new(schema);
    let PipelineHandles {
        outcome_rx,
        watch_handle,
        worker_handles,
        scan_errors,
    } = run_pipeline(dir, schema, opts, filter);

    let stats = deliver_outcomes(outcome_rx, record_sink, error_sink);
    let files_dispatched = shutdown_pipeline(watch_handle, worker_handles)?;
    report_scan_failures(&scan_errors);

    Ok(IngestSummary {
        files_dispatched,
        records_published: stats.records,
        lines_failed: stats.errors,
        sink_failures: stats.sink_failures,
    })
}
