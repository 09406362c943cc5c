//! Pipeline context: channels, shared scan-error state, thread handles,
//! tuning.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::errors::IngestError;
use crate::types::{DecodedRecord, DiscoveredFile};
use crate::utils::config::{FILE_QUEUE_CAP, OUTCOME_QUEUE_CAP};

/// Tuning resolved before the pipeline starts.
#[derive(Clone, Copy, Debug)]
pub struct PipelineTuning {
    /// Worker threads; each owns one file end-to-end so in-file line order
    /// is preserved without coordination.
    pub num_workers: usize,
    pub scan_interval: Duration,
    /// Scan once and drain instead of watching indefinitely.
    pub once: bool,
}

/// One line's (or one whole file's) outcome, emitted by a worker in line
/// order and routed to exactly one of the two sinks.
pub enum LineOutcome {
    Record(DecodedRecord),
    Failed(IngestError),
}

/// Shared context for the watch thread: stop flag plus the record of
/// listing failures (recoverable; summarized when the run ends).
pub struct WatchContext {
    pub stop: Arc<AtomicBool>,
    pub scan_errors: Arc<Mutex<Vec<String>>>,
}

/// Channels for the watch → workers → delivery pipeline. The watch thread
/// gets file_tx; workers get file_rx and outcome_tx; the caller drains
/// outcome_rx.
pub struct PipelineChannels {
    pub file_tx: Sender<DiscoveredFile>,
    pub file_rx: Receiver<DiscoveredFile>,
    pub outcome_tx: Sender<LineOutcome>,
    pub outcome_rx: Receiver<LineOutcome>,
    pub scan_errors: Arc<Mutex<Vec<String>>>,
}

pub fn create_pipeline_channels() -> PipelineChannels {
    let (file_tx, file_rx) = bounded::<DiscoveredFile>(FILE_QUEUE_CAP);
    let (outcome_tx, outcome_rx) = bounded::<LineOutcome>(OUTCOME_QUEUE_CAP);
    PipelineChannels {
        file_tx,
        file_rx,
        outcome_tx,
        outcome_rx,
        scan_errors: Arc::new(Mutex::new(Vec::new())),
    }
}

/// Handles returned by [`run_pipeline`](crate::pipeline::run_pipeline):
/// drain `outcome_rx`, then join. The watch handle yields the number of
/// files dispatched over the run.
pub struct PipelineHandles {
    pub outcome_rx: Receiver<LineOutcome>,
    pub watch_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<()>>,
    pub scan_errors: Arc<Mutex<Vec<String>>>,
}
