//! Watch thread: repeated scan ticks with a stop-aware interval sleep.

use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::types::DiscoveredFile;
use crate::utils::config::SHUTDOWN_POLL;
use crate::watch::DirectoryWatcher;

use super::context::WatchContext;

pub fn spawn_watch_thread(
    mut watcher: DirectoryWatcher,
    file_tx: Sender<DiscoveredFile>,
    ctx: WatchContext,
    interval: Duration,
    once: bool,
) -> JoinHandle<usize> {
    thread::spawn(move || run_watch_loop(&mut watcher, file_tx, &ctx, interval, once))
}

/// Run scan ticks until stopped (or after one tick in once mode). Listing
/// failures are recoverable: logged, recorded in `ctx.scan_errors`, retried
/// next tick. Drops `file_tx` on exit so workers see the channel close.
/// Returns the total number of files dispatched.
pub fn run_watch_loop(
    watcher: &mut DirectoryWatcher,
    file_tx: Sender<DiscoveredFile>,
    ctx: &WatchContext,
    interval: Duration,
    once: bool,
) -> usize {
    let mut total = 0_usize;
    loop {
        match watcher.scan_tick(&file_tx) {
            Ok(n) => {
                if n > 0 {
                    log::debug!("scan: dispatched {} file(s)", n);
                }
                total += n;
            }
            Err(err) => {
                log::warn!("{}", err);
                ctx.scan_errors.lock().unwrap().push(err.to_string());
            }
        }
        if once || ctx.stop.load(Ordering::Relaxed) {
            break;
        }
        if sleep_until_next_tick(interval, &ctx.stop) {
            break;
        }
    }
    drop(file_tx);
    total
}

/// Sleep `interval` in short slices so a stop request is noticed promptly.
/// Returns true when the stop flag was raised mid-sleep.
fn sleep_until_next_tick(interval: Duration, stop: &AtomicBool) -> bool {
    let deadline = Instant::now() + interval;
    loop {
        if stop.load(Ordering::Relaxed) {
            return true;
        }
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        thread::sleep(SHUTDOWN_POLL.min(remaining));
    }
}
