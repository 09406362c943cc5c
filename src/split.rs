//! Lazy per-file line splitting.
//!
//! A [`LineSeq`] reads incrementally through a `BufReader`, so multi-gigabyte
//! files never materialize in memory. The sequence is finite and single-pass:
//! re-splitting a file means calling [`split`] again.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::Arc;

use crate::errors::FileReadError;
use crate::types::{DiscoveredFile, RawLine};

/// Open `file` and return its line sequence. With `skip_header` the first
/// physical line is consumed and discarded, so the first yielded line is
/// numbered 2. Open failure is reported here, before any line is produced.
pub fn split(file: Arc<DiscoveredFile>, skip_header: bool) -> Result<LineSeq, FileReadError> {
    let handle = File::open(&file.path).map_err(|e| FileReadError {
        file: file.path.clone(),
        line_number: 0,
        source: e,
    })?;
    let mut seq = LineSeq {
        source: file,
        reader: Some(BufReader::new(handle)),
        number: 0,
    };
    if skip_header {
        match seq.next() {
            Some(Err(err)) => return Err(err),
            Some(Ok(_)) | None => {}
        }
    }
    Ok(seq)
}

/// Ordered, fused sequence of a file's physical lines with 1-based numbering.
/// The file handle is dropped before EOF or an error is reported, so a
/// consumer that sees the sequence end knows the handle is closed.
#[derive(Debug)]
pub struct LineSeq {
    source: Arc<DiscoveredFile>,
    reader: Option<BufReader<File>>,
    number: u64,
}

impl Iterator for LineSeq {
    type Item = Result<RawLine, FileReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.reader.as_mut()?;
        let mut text = String::new();
        match reader.read_line(&mut text) {
            Ok(0) => {
                self.reader = None;
                None
            }
            Ok(_) => {
                self.number += 1;
                // Line terminators are not part of the record text.
                if text.ends_with('\n') {
                    text.pop();
                    if text.ends_with('\r') {
                        text.pop();
                    }
                }
                Some(Ok(RawLine {
                    source: Arc::clone(&self.source),
                    number: self.number,
                    text,
                }))
            }
            Err(e) => {
                self.reader = None;
                Some(Err(FileReadError {
                    file: self.source.path.clone(),
                    line_number: self.number + 1,
                    source: e,
                }))
            }
        }
    }
}
