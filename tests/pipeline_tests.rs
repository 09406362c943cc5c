//! End-to-end pipeline tests: directory in, records and errors out.

use anyhow::Result;
use linetap::errors::{DecodeError, DecodeReason, IngestError};
use linetap::schema::{FieldKind, FieldSpec, RecordSchema};
use linetap::sink::{ErrorSink, RecordSink};
use linetap::types::{DecodedRecord, FieldValue, IngestOpts};
use linetap::watch::DuplicateFilter;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

#[derive(Default)]
struct CollectRecords {
    records: Vec<DecodedRecord>,
    content_types: Vec<String>,
    fail_first: bool,
}

impl RecordSink for CollectRecords {
    fn publish(&mut self, record: &DecodedRecord, content_type: &str) -> Result<()> {
        if self.fail_first && self.records.is_empty() && self.content_types.is_empty() {
            self.content_types.push(content_type.to_string());
            anyhow::bail!("downstream unavailable");
        }
        self.records.push(record.clone());
        self.content_types.push(content_type.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct CollectErrors {
    decode_errors: Vec<DecodeError>,
    read_failures: Vec<String>,
}

impl ErrorSink for CollectErrors {
    fn publish_error(&mut self, error: &IngestError) -> Result<()> {
        match error {
            IngestError::Decode(e) => self.decode_errors.push(e.clone()),
            IngestError::FileRead(e) => self.read_failures.push(e.to_string()),
        }
        Ok(())
    }
}

fn person_schema() -> RecordSchema {
    RecordSchema::new(vec![
        FieldSpec::new("id", FieldKind::Int),
        FieldSpec::new("name", FieldKind::Str),
        FieldSpec::new("age", FieldKind::Int).nullable(),
    ])
    .unwrap()
}

fn once_opts() -> IngestOpts {
    IngestOpts {
        once: true,
        num_workers: Some(1),
        ..Default::default()
    }
}

#[test]
fn test_end_to_end_null_and_value() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "1;Alice;NULL\n2;Bob;30\n").unwrap();

    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();
    let summary = linetap::ingest_dir(
        dir.path(),
        person_schema(),
        &once_opts(),
        &mut records,
        &mut errors,
    )
    .unwrap();

    assert_eq!(summary.files_dispatched, 1);
    assert_eq!(summary.records_published, 2);
    assert_eq!(summary.lines_failed, 0);
    assert_eq!(summary.sink_failures, 0);

    assert_eq!(records.records[0].get("id"), Some(&FieldValue::Int(1)));
    assert_eq!(
        records.records[0].get("name"),
        Some(&FieldValue::Str("Alice".into()))
    );
    assert_eq!(records.records[0].get("age"), Some(&FieldValue::Null));
    assert_eq!(records.records[1].get("id"), Some(&FieldValue::Int(2)));
    assert_eq!(records.records[1].get("age"), Some(&FieldValue::Int(30)));
    assert!(errors.decode_errors.is_empty());
}

#[test]
fn test_records_carry_json_content_type() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "2;Bob;30\n").unwrap();

    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();
    linetap::ingest_dir(
        dir.path(),
        person_schema(),
        &once_opts(),
        &mut records,
        &mut errors,
    )
    .unwrap();

    assert_eq!(records.content_types, vec!["application/json"]);
}

#[test]
fn test_bad_line_reported_and_pipeline_continues() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "x;Alice;30\n2;Bob;30\n").unwrap();

    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();
    let summary = linetap::ingest_dir(
        dir.path(),
        person_schema(),
        &once_opts(),
        &mut records,
        &mut errors,
    )
    .unwrap();

    assert_eq!(summary.records_published, 1);
    assert_eq!(summary.lines_failed, 1);

    let err = &errors.decode_errors[0];
    assert_eq!(err.line_number, 1);
    assert_eq!(err.raw, "x;Alice;30");
    assert_eq!(
        err.reason,
        DecodeReason::TypeCoercion {
            field: "id".into(),
            text: "x".into(),
            expected: FieldKind::Int,
        }
    );
    // The line after the bad one still decoded.
    assert_eq!(records.records[0].get("name"), Some(&FieldValue::Str("Bob".into())));
}

#[test]
fn test_in_file_order_is_preserved_at_the_sinks() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "1;a;1\n2;b;2\n3;c;3\n").unwrap();

    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();
    linetap::ingest_dir(
        dir.path(),
        person_schema(),
        &once_opts(),
        &mut records,
        &mut errors,
    )
    .unwrap();

    let ids: Vec<_> = records
        .records
        .iter()
        .map(|r| r.get("id").cloned().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec![FieldValue::Int(1), FieldValue::Int(2), FieldValue::Int(3)]
    );
}

#[test]
fn test_header_line_is_consumed_not_decoded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "id;name;age\n2;Bob;30\n").unwrap();

    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();
    let summary = linetap::ingest_dir(
        dir.path(),
        person_schema().with_header(true),
        &once_opts(),
        &mut records,
        &mut errors,
    )
    .unwrap();

    assert_eq!(summary.records_published, 1);
    assert_eq!(summary.lines_failed, 0);
    assert_eq!(records.records[0].get("id"), Some(&FieldValue::Int(2)));
}

#[test]
fn test_multiple_files_all_processed() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "1;a;1\n").unwrap();
    fs::write(dir.path().join("b.csv"), "2;b;2\n").unwrap();

    let opts = IngestOpts {
        once: true,
        num_workers: Some(2),
        ..Default::default()
    };
    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();
    let summary = linetap::ingest_dir(
        dir.path(),
        person_schema(),
        &opts,
        &mut records,
        &mut errors,
    )
    .unwrap();

    assert_eq!(summary.files_dispatched, 2);
    assert_eq!(summary.records_published, 2);
}

#[test]
fn test_second_run_with_shared_filter_dispatches_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "1;a;1\n").unwrap();

    let filter = Arc::new(Mutex::new(DuplicateFilter::new()));
    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();

    let first = linetap::ingest_dir_with_filter(
        dir.path(),
        person_schema(),
        &once_opts(),
        Arc::clone(&filter),
        &mut records,
        &mut errors,
    )
    .unwrap();
    assert_eq!(first.files_dispatched, 1);

    let second = linetap::ingest_dir_with_filter(
        dir.path(),
        person_schema(),
        &once_opts(),
        filter,
        &mut records,
        &mut errors,
    )
    .unwrap();
    assert_eq!(second.files_dispatched, 0);
    assert_eq!(second.records_published, 0);
}

#[test]
fn test_pattern_restricts_ingestion() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "1;a;1\n").unwrap();
    fs::write(dir.path().join("skip.txt"), "not;a;record\n").unwrap();

    let opts = IngestOpts {
        once: true,
        num_workers: Some(1),
        pattern: Some("*.csv".to_string()),
        ..Default::default()
    };
    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();
    let summary = linetap::ingest_dir(
        dir.path(),
        person_schema(),
        &opts,
        &mut records,
        &mut errors,
    )
    .unwrap();

    assert_eq!(summary.files_dispatched, 1);
    assert_eq!(summary.records_published, 1);
}

#[test]
fn test_failed_publish_is_counted_not_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("a.csv"), "1;a;1\n2;b;2\n").unwrap();

    let mut records = CollectRecords {
        fail_first: true,
        ..Default::default()
    };
    let mut errors = CollectErrors::default();
    let summary = linetap::ingest_dir(
        dir.path(),
        person_schema(),
        &once_opts(),
        &mut records,
        &mut errors,
    )
    .unwrap();

    // First publish failed, second went through; the run still completed.
    assert_eq!(summary.sink_failures, 1);
    assert_eq!(summary.records_published, 1);
    assert_eq!(records.records.len(), 1);
    assert_eq!(records.records[0].get("id"), Some(&FieldValue::Int(2)));
}

#[test]
fn test_empty_directory_completes_with_empty_summary() {
    let dir = TempDir::new().unwrap();

    let mut records = CollectRecords::default();
    let mut errors = CollectErrors::default();
    let summary = linetap::ingest_dir(
        dir.path(),
        person_schema(),
        &once_opts(),
        &mut records,
        &mut errors,
    )
    .unwrap();

    assert_eq!(summary, linetap::IngestSummary::default());
}
