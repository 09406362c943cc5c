//! Wire the watcher, workers, and delivery loop together.

use anyhow::Result;
use crossbeam_channel::Receiver;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::schema::RecordSchema;
use crate::sink::{ErrorSink, RecordSink};
use crate::types::IngestOpts;
use crate::utils::config::{CONTENT_TYPE_JSON, DEFAULT_SCAN_INTERVAL, WorkerLimits};
use crate::utils::fd_limit::max_workers_by_fd_limit;
use crate::watch::{DirectoryWatcher, DuplicateFilter};

use super::context::{
    LineOutcome, PipelineHandles, PipelineTuning, WatchContext, create_pipeline_channels,
};
use super::scan::spawn_watch_thread;
use super::workers::spawn_file_workers;

/// Resolve worker count and scan cadence from opts and the environment.
pub fn resolve_tuning(opts: &IngestOpts) -> PipelineTuning {
    let num_workers = opts
        .num_workers
        .unwrap_or_else(default_worker_count)
        .max(WorkerLimits::FLOOR);
    PipelineTuning {
        num_workers,
        scan_interval: opts.scan_interval.unwrap_or(DEFAULT_SCAN_INTERVAL),
        once: opts.once,
    }
}

/// Available threads, capped by the configured maximum and the FD limit
/// (each worker holds one open source file).
fn default_worker_count() -> usize {
    let mut n = rayon::current_num_threads().min(WorkerLimits::DEFAULT_MAX);
    if let Some(cap) = max_workers_by_fd_limit() {
        n = n.min(cap);
    }
    n.max(WorkerLimits::FLOOR)
}

/// Start the watch + decode pipeline. Returns handles; the caller drains
/// `outcome_rx` (usually via [`deliver_outcomes`]) and must join when done.
pub fn run_pipeline(
    dir: &Path,
    schema: Arc<RecordSchema>,
    opts: &IngestOpts,
    filter: Arc<Mutex<DuplicateFilter>>,
) -> PipelineHandles {
    let tuning = resolve_tuning(opts);
    let channels = create_pipeline_channels();

    let ctx = WatchContext {
        stop: opts.stop.clone().unwrap_or_default(),
        scan_errors: Arc::clone(&channels.scan_errors),
    };
    let watcher = DirectoryWatcher::new(dir, opts, filter);
    let watch_handle = spawn_watch_thread(
        watcher,
        channels.file_tx,
        ctx,
        tuning.scan_interval,
        tuning.once,
    );

    let worker_handles = spawn_file_workers(
        channels.file_rx,
        &channels.outcome_tx,
        &schema,
        tuning.num_workers,
    );

    // Dropping the last sender here means the outcome channel closes as soon
    // as every worker exits.
    drop(channels.outcome_tx);

    PipelineHandles {
        outcome_rx: channels.outcome_rx,
        watch_handle,
        worker_handles,
        scan_errors: channels.scan_errors,
    }
}

/// Per-run delivery totals.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeliveryStats {
    pub records: u64,
    pub errors: u64,
    pub sink_failures: u64,
}

/// Drain outcomes and drive the two sinks until the outcome channel closes.
/// Every error-sink delivery is also surfaced as a warn log line; a failed
/// publish is logged and counted, never fatal.
pub fn deliver_outcomes(
    outcome_rx: Receiver<LineOutcome>,
    record_sink: &mut dyn RecordSink,
    error_sink: &mut dyn ErrorSink,
) -> DeliveryStats {
    let mut stats = DeliveryStats::default();
    while let Ok(outcome) = outcome_rx.recv() {
        match outcome {
            LineOutcome::Record(record) => {
                match record_sink.publish(&record, CONTENT_TYPE_JSON) {
                    Ok(()) => stats.records += 1,
                    Err(err) => {
                        log::warn!("record sink publish failed: {:#}", err);
                        stats.sink_failures += 1;
                    }
                }
            }
            LineOutcome::Failed(error) => {
                log::warn!("{}", error);
                stats.errors += 1;
                if let Err(err) = error_sink.publish_error(&error) {
                    log::warn!("error sink publish failed: {:#}", err);
                    stats.sink_failures += 1;
                }
            }
        }
    }
    stats
}

/// Join watch and worker threads after the outcome stream is drained.
/// Returns the number of files dispatched.
pub fn shutdown_pipeline(
    watch_handle: JoinHandle<usize>,
    worker_handles: Vec<JoinHandle<()>>,
) -> Result<usize> {
    let files = watch_handle
        .join()
        .map_err(|_| anyhow::anyhow!("watch thread panicked"))?;
    for h in worker_handles {
        let _ = h.join();
    }
    Ok(files)
}
