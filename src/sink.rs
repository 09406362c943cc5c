//! Output ports: one for decoded records, one for everything that failed.
//!
//! The pipeline writes to these two seams instead of threading exceptions
//! through control flow; a per-line failure therefore never aborts file-level
//! iteration. Transport is the implementor's business — the built-ins here
//! write JSON lines to any `io::Write`.

use anyhow::Result;
use std::io::Write;

use serde_json::json;

use crate::errors::{DecodeReason, IngestError};
use crate::types::DecodedRecord;

/// Downstream publisher for successfully decoded records. Records arrive one
/// at a time, in per-file line order. A returned error is logged and counted
/// by the pipeline, never fatal.
pub trait RecordSink {
    fn publish(&mut self, record: &DecodedRecord, content_type: &str) -> Result<()>;
}

/// Downstream publisher for per-line and per-file failures. Same delivery
/// contract as [`RecordSink`].
pub trait ErrorSink {
    fn publish_error(&mut self, error: &IngestError) -> Result<()>;
}

/// Writes each record as one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> RecordSink for JsonLinesSink<W> {
    fn publish(&mut self, record: &DecodedRecord, _content_type: &str) -> Result<()> {
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

/// Writes each failure as one JSON object per line, carrying everything an
/// operator needs to locate and reprocess the offending input.
pub struct JsonErrorSink<W: Write> {
    out: W,
}

impl<W: Write> JsonErrorSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> ErrorSink for JsonErrorSink<W> {
    fn publish_error(&mut self, error: &IngestError) -> Result<()> {
        serde_json::to_writer(&mut self.out, &error_json(error))?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

fn error_json(error: &IngestError) -> serde_json::Value {
    match error {
        IngestError::Decode(e) => json!({
            "file": e.file.display().to_string(),
            "line": e.line_number,
            "raw": e.raw,
            "reason": reason_label(&e.reason),
            "field": e.reason.field(),
            "detail": e.reason.to_string(),
        }),
        IngestError::FileRead(e) => json!({
            "file": e.file.display().to_string(),
            "line": e.line_number,
            "reason": "file_read",
            "detail": e.to_string(),
        }),
    }
}

fn reason_label(reason: &DecodeReason) -> &'static str {
    match reason {
        DecodeReason::FieldCountMismatch { .. } => "field_count_mismatch",
        DecodeReason::UnexpectedNull { .. } => "unexpected_null",
        DecodeReason::TypeCoercion { .. } => "type_coercion",
    }
}
