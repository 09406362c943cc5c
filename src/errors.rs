//! Error taxonomy for the ingestion pipeline.
//!
//! Nothing here is fatal to the process: listing failures are retried on the
//! next tick, read failures abort one file, decode failures abort one line.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::schema::FieldKind;

/// Why a single line failed to decode.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodeReason {
    #[error("expected {expected} fields, found {found}")]
    FieldCountMismatch { expected: usize, found: usize },

    #[error("null in non-nullable field `{field}`")]
    UnexpectedNull { field: String },

    #[error("field `{field}`: cannot parse `{text}` as {expected}")]
    TypeCoercion {
        field: String,
        text: String,
        expected: FieldKind,
    },
}

impl DecodeReason {
    /// Offending field name, where one is identifiable.
    pub fn field(&self) -> Option<&str> {
        match self {
            DecodeReason::FieldCountMismatch { .. } => None,
            DecodeReason::UnexpectedNull { field } => Some(field),
            DecodeReason::TypeCoercion { field, .. } => Some(field),
        }
    }
}

/// A line that could not be decoded, with enough context to locate and
/// reconstruct it downstream.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{}:{line_number}: {reason}", .file.display())]
pub struct DecodeError {
    pub file: PathBuf,
    pub line_number: u64,
    /// The raw text exactly as read from the file.
    pub raw: String,
    pub reason: DecodeReason,
}

/// A file that disappeared or became unreadable. Aborts that file's
/// remaining lines; reported once per file.
#[derive(Debug, Error)]
#[error("{}: read failed near line {line_number}: {source}", .file.display())]
pub struct FileReadError {
    pub file: PathBuf,
    /// Line the reader was about to produce; 0 when the file failed to open.
    pub line_number: u64,
    #[source]
    pub source: std::io::Error,
}

/// A directory listing that failed (permissions, directory removed).
/// The watcher stays idle and retries on the next tick.
#[derive(Debug, Error)]
#[error("cannot list `{}`: {source}", .dir.display())]
pub struct DirectoryListError {
    pub dir: PathBuf,
    #[source]
    pub source: walkdir::Error,
}

/// Error-path payload delivered to the error sink.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    FileRead(#[from] FileReadError),
}

impl IngestError {
    /// Path of the file the failure belongs to.
    pub fn file(&self) -> &Path {
        match self {
            IngestError::Decode(e) => &e.file,
            IngestError::FileRead(e) => &e.file,
        }
    }

    pub fn line_number(&self) -> u64 {
        match self {
            IngestError::Decode(e) => e.line_number,
            IngestError::FileRead(e) => e.line_number,
        }
    }
}
