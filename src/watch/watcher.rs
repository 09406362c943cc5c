//! Directory watcher: per-tick scan, signature computation, duplicate
//! check-and-mark, dispatch.

use crossbeam_channel::Sender;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::hashing::hash_file;
use crate::engine::tools::matches_pattern;
use crate::errors::DirectoryListError;
use crate::types::{DiscoveredFile, FileSignature, IngestOpts, SignatureScheme};
use crate::watch::dedupe::DuplicateFilter;
use crate::watch::scanner::list_candidates;

/// Where the watcher is within one tick. Idle between ticks; Scanning while
/// listing and fingerprinting; Dispatching once the first candidate of the
/// tick is emitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Scanning,
    Dispatching,
}

/// Polls a directory and emits files not previously dispatched.
pub struct DirectoryWatcher {
    dir: PathBuf,
    pattern: Option<String>,
    scheme: SignatureScheme,
    recursive: bool,
    prevent_duplicates: bool,
    filter: Arc<Mutex<DuplicateFilter>>,
    state: WatchState,
}

impl DirectoryWatcher {
    /// The filter is injected so callers control the seen-set's lifetime
    /// (and tests get a fresh one each).
    pub fn new(dir: &Path, opts: &IngestOpts, filter: Arc<Mutex<DuplicateFilter>>) -> Self {
        Self {
            dir: dir.to_path_buf(),
            pattern: opts.pattern.clone(),
            scheme: opts.signature,
            recursive: opts.recursive,
            prevent_duplicates: opts.prevent_duplicates,
            filter,
            state: WatchState::Idle,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    /// Run one scan tick: list, filter by name, fingerprint, consult the
    /// duplicate filter, and dispatch survivors in listing order. Returns
    /// the number dispatched. A listing failure leaves the watcher Idle for
    /// the caller to retry next tick.
    pub fn scan_tick(
        &mut self,
        file_tx: &Sender<DiscoveredFile>,
    ) -> Result<usize, DirectoryListError> {
        self.state = WatchState::Scanning;
        let candidates = match list_candidates(&self.dir, self.recursive) {
            Ok(c) => c,
            Err(err) => {
                self.state = WatchState::Idle;
                return Err(err);
            }
        };

        let mut dispatched = 0;
        for path in candidates {
            if !matches_pattern(&path, self.pattern.as_deref()) {
                continue;
            }
            let Some(file) = self.discover(path) else {
                continue;
            };
            if self.prevent_duplicates {
                // Check and mark under one lock hold. Marking before dispatch
                // makes delivery at-most-once: a crash mid-file loses that
                // file's remaining lines for this process lifetime.
                let mut filter = self.filter.lock().unwrap();
                if !filter.should_process(&file) {
                    continue;
                }
                filter.mark_processed(&file);
            }
            self.state = WatchState::Dispatching;
            if file_tx.send(file).is_err() {
                // Consumer gone (shutdown); stop dispatching.
                break;
            }
            dispatched += 1;
        }
        self.state = WatchState::Idle;
        Ok(dispatched)
    }

    /// Stat one candidate and compute its signature. None (with a log line)
    /// when the file vanished or cannot be read between listing and stat;
    /// the next tick retries it.
    fn discover(&self, path: PathBuf) -> Option<DiscoveredFile> {
        let meta = match std::fs::metadata(&path) {
            Ok(m) => m,
            Err(err) => {
                log::warn!("scan: cannot stat {}: {}", path.display(), err);
                return None;
            }
        };
        if !meta.is_file() {
            return None;
        }
        let signature = match file_signature(&path, &meta, self.scheme) {
            Ok(s) => s,
            Err(err) => {
                log::warn!("scan: cannot fingerprint {}: {:#}", path.display(), err);
                return None;
            }
        };
        Some(DiscoveredFile {
            path,
            signature,
            discovered_at: SystemTime::now(),
        })
    }
}

/// Compute the modification signature for one candidate.
pub fn file_signature(
    path: &Path,
    meta: &Metadata,
    scheme: SignatureScheme,
) -> anyhow::Result<FileSignature> {
    match scheme {
        SignatureScheme::MtimeSize => Ok(FileSignature::MtimeSize {
            mtime_ns: mtime_ns(meta),
            size: meta.len(),
        }),
        SignatureScheme::Content => Ok(FileSignature::Content(hash_file(path, meta.len())?)),
    }
}

fn mtime_ns(meta: &Metadata) -> i64 {
    meta.modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}
