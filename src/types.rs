//! Public and internal types for the linetap API and pipeline.

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, SystemTime};

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// How a file's modification signature is computed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SignatureScheme {
    /// Modification time (nanoseconds) plus size. Cheap; no file reads.
    #[default]
    MtimeSize,
    /// Blake3 hash of the file contents. Detects rewrites that preserve
    /// mtime and size, at the cost of reading every new candidate once.
    Content,
}

impl std::fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignatureScheme::MtimeSize => write!(f, "mtime-size"),
            SignatureScheme::Content => write!(f, "content"),
        }
    }
}

impl FromStr for SignatureScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mtime-size" | "mtime_size" | "mtimesize" => Ok(SignatureScheme::MtimeSize),
            "content" | "hash" => Ok(SignatureScheme::Content),
            _ => Err(format!("unknown signature scheme: {}", s)),
        }
    }
}

/// Fingerprint used to detect file content changes without a full re-read
/// on every scan. Two files with equal paths but different signatures are
/// different identities to the duplicate filter.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FileSignature {
    MtimeSize { mtime_ns: i64, size: u64 },
    Content([u8; 32]),
}

/// A regular file found by a directory scan. Created by the watcher,
/// consumed once by the splitter; not mutated.
#[derive(Clone, Debug)]
pub struct DiscoveredFile {
    /// Absolute path as listed.
    pub path: PathBuf,
    pub signature: FileSignature,
    pub discovered_at: SystemTime,
}

/// One physical line read from a discovered file. Line numbers are 1-based
/// and count physical lines, so a skipped header still occupies number 1.
#[derive(Clone, Debug)]
pub struct RawLine {
    pub source: Arc<DiscoveredFile>,
    pub number: u64,
    pub text: String,
}

/// A single decoded field value. Serializes untagged, so a record becomes a
/// plain JSON object (`Null` → `null`, `Date` → `"2024-06-01"`, decimals as
/// strings to keep precision).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Date(NaiveDate),
    Str(String),
}

/// One successfully decoded line: (field name, value) pairs in schema order.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedRecord {
    fields: Vec<(String, FieldValue)>,
}

impl DecodedRecord {
    pub(crate) fn new(fields: Vec<(String, FieldValue)>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Value of the named field, if the schema declared it.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl Serialize for DecodedRecord {
    /// JSON object preserving schema field order.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Options for [`ingest_dir`](crate::ingest_dir).
#[derive(Clone, Debug)]
pub struct IngestOpts {
    /// Filename glob (e.g. `*.csv`); only matching files are ingested.
    pub pattern: Option<String>,
    /// Tick interval between directory scans. When None, uses the default
    /// from [`utils::config`](crate::utils::config).
    pub scan_interval: Option<Duration>,
    /// When false, every scan re-emits every matching file.
    pub prevent_duplicates: bool,
    /// How file identities are fingerprinted for duplicate suppression.
    pub signature: SignatureScheme,
    /// Scan subdirectories too. Default is a flat scan of the drop directory.
    pub recursive: bool,
    /// Override worker thread count (one file per worker). When None, derived
    /// from available threads and the FD limit.
    pub num_workers: Option<usize>,
    /// Scan once, drain every dispatched file, and return instead of
    /// watching indefinitely.
    pub once: bool,
    /// Cooperative stop flag; raise it to end a watching run. The CLI wires
    /// Ctrl-C to this.
    pub stop: Option<Arc<AtomicBool>>,
}

impl Default for IngestOpts {
    fn default() -> Self {
        Self {
            pattern: None,
            scan_interval: None,
            prevent_duplicates: true,
            signature: SignatureScheme::MtimeSize,
            recursive: false,
            num_workers: None,
            once: false,
            stop: None,
        }
    }
}

/// Totals for one [`ingest_dir`](crate::ingest_dir) run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Files dispatched by the watcher.
    pub files_dispatched: usize,
    /// Records accepted by the record sink.
    pub records_published: u64,
    /// Lines (or whole files) routed to the error sink.
    pub lines_failed: u64,
    /// Sink publishes that themselves failed (logged, never fatal).
    pub sink_failures: u64,
}
