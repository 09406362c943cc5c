//! File workers: split and decode one file end-to-end, emitting outcomes in
//! line order. One worker owns one file at a time, so per-producer channel
//! FIFO keeps a file's outcomes ordered; files on different workers
//! interleave freely.

use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::decode::decode;
use crate::schema::RecordSchema;
use crate::split::split;
use crate::types::DiscoveredFile;

use super::context::LineOutcome;

/// Single worker: read files from file_rx, turn each line into an outcome,
/// send on outcome_tx. Exits when the file channel closes.
fn file_worker_loop(
    file_rx: Receiver<DiscoveredFile>,
    outcome_tx: Sender<LineOutcome>,
    schema: Arc<RecordSchema>,
) {
    while let Ok(file) = file_rx.recv() {
        if !process_file(file, &outcome_tx, &schema) {
            return;
        }
    }
    drop(outcome_tx);
}

/// Split and decode one file. A line's failure never aborts the rest of the
/// file; a read failure ends the file after one report. Returns false when
/// the outcome channel is closed (delivery side gone).
fn process_file(
    file: DiscoveredFile,
    outcome_tx: &Sender<LineOutcome>,
    schema: &RecordSchema,
) -> bool {
    let source = Arc::new(file);
    log::debug!("processing {}", source.path.display());

    let seq = match split(Arc::clone(&source), schema.has_header()) {
        Ok(seq) => seq,
        Err(err) => return outcome_tx.send(LineOutcome::Failed(err.into())).is_ok(),
    };
    for item in seq {
        let outcome = match item {
            Ok(raw) => match decode(schema, &raw) {
                Ok(record) => LineOutcome::Record(record),
                Err(err) => LineOutcome::Failed(err.into()),
            },
            // The sequence fuses after a read failure; this is the file's
            // single abort report.
            Err(err) => LineOutcome::Failed(err.into()),
        };
        if outcome_tx.send(outcome).is_err() {
            return false;
        }
    }
    true
}

/// Spawn file workers. Caller must drop its outcome sender after this so the
/// channel closes once workers exit.
pub fn spawn_file_workers(
    file_rx: Receiver<DiscoveredFile>,
    outcome_tx: &Sender<LineOutcome>,
    schema: &Arc<RecordSchema>,
    num_workers: usize,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|_| {
            let file_rx = file_rx.clone();
            let outcome_tx = outcome_tx.clone();
            let schema = Arc::clone(schema);
            thread::spawn(move || file_worker_loop(file_rx, outcome_tx, schema))
        })
        .collect()
}
