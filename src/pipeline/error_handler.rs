//! End-of-run reporting for recoverable scan failures.

use std::sync::{Arc, Mutex};

/// Summarize directory-listing failures recorded during the run. Call after
/// joining the watch thread. Each failure was already logged when it
/// happened; this is the closing tally.
pub fn report_scan_failures(scan_errors: &Arc<Mutex<Vec<String>>>) {
    let errors = scan_errors.lock().unwrap();
    if errors.is_empty() {
        return;
    }
    log::warn!(
        "{} scan tick(s) failed to list the watched directory",
        errors.len()
    );
    for msg in errors.iter() {
        log::debug!("  {}", msg);
    }
}
