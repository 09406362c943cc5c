//! Application configuration constants.
//! Tuning and thresholds in one place.

use std::sync::OnceLock;
use std::time::Duration;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Config file looked up in the watched directory (e.g. `.linetap.toml`).
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }
}

// ---- Record metadata ----

/// Content-type tag attached to every published record.
pub const CONTENT_TYPE_JSON: &str = "application/json";

// ---- Scan cadence ----

/// Default tick interval between directory scans.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_millis(1000);

/// Slice used while sleeping between ticks so a stop request is noticed
/// promptly.
pub const SHUTDOWN_POLL: Duration = Duration::from_millis(50);

// ---- Worker threads ----

/// Worker pool limits. Each worker owns one open source file end-to-end.
pub struct WorkerLimits;

impl WorkerLimits {
    /// Floor / minimum workers.
    pub const FLOOR: usize = 1;
    /// Cap when deriving the count from available threads; decoding is
    /// cheap enough that more workers mostly just hold more open files.
    pub const DEFAULT_MAX: usize = 8;
}

// ---- Streaming channel caps ----

/// File queue cap: bounds how far discovery can run ahead of decoding.
pub const FILE_QUEUE_CAP: usize = 1_024;

/// Outcome queue cap: bounds decoded-but-undelivered lines across all
/// workers when the sinks are slower than the decoders.
pub const OUTCOME_QUEUE_CAP: usize = 16_384;

// ---- Hashing ----

/// Content-signature I/O thresholds and buffer sizes.
pub struct HashingConsts;

impl HashingConsts {
    /// File size above which hashing uses memory-mapped I/O (bytes). 100 MB.
    pub const HASH_MMAP_THRESHOLD: u64 = 100 * 1024 * 1024;
    /// Chunk size for reading files below the mmap threshold (bytes). 1 MB.
    pub const HASH_READ_CHUNK_SIZE: usize = 1024 * 1024;
}
