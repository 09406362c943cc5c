//! Directory watching: scanning, file signatures, duplicate suppression.

pub mod dedupe;
pub mod scanner;
pub mod watcher;

pub use dedupe::{DuplicateFilter, FileIdentity};
pub use scanner::list_candidates;
pub use watcher::{DirectoryWatcher, WatchState, file_signature};
