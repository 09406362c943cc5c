//! Duplicate suppression: which file identities have already been dispatched.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::types::{DiscoveredFile, FileSignature};

/// Identity under which a file is tracked: path plus modification signature.
/// A rewrite at the same path produces a new signature and therefore a new
/// identity; the file is dispatched again.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileIdentity {
    pub path: PathBuf,
    pub signature: FileSignature,
}

impl From<&DiscoveredFile> for FileIdentity {
    fn from(file: &DiscoveredFile) -> Self {
        Self {
            path: file.path.clone(),
            signature: file.signature.clone(),
        }
    }
}

/// In-memory seen-set of dispatched file identities. Grows monotonically
/// until [`reset`](Self::reset). The watcher serializes all access behind a
/// mutex and holds the check and the mark under one lock acquisition, so two
/// scan ticks can never double-dispatch the same identity.
#[derive(Debug, Default)]
pub struct DuplicateFilter {
    seen: HashSet<FileIdentity>,
}

impl DuplicateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff no entry with the same (path, signature) has been marked.
    pub fn should_process(&self, file: &DiscoveredFile) -> bool {
        !self.seen.contains(&FileIdentity::from(file))
    }

    /// Record that `file` is being dispatched. Called exactly once per
    /// dispatched file, before it is emitted downstream.
    pub fn mark_processed(&mut self, file: &DiscoveredFile) {
        self.seen.insert(FileIdentity::from(file));
    }

    /// Forget every tracked identity; the next scan re-dispatches everything.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
