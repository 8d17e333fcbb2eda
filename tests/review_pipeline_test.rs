//! End-to-end review flows against a scripted oracle
//!
//! Covers routing per category, result ordering, the one-result-per-unit rule
//! and report disposal after delivery.

mod support;

use reviewbox::ai::{BackendError, MockOracle, MockResponse};
use reviewbox::pipeline::orchestrator::{ARCHIVE_HEADER, CSV_HEADER, JSON_HEADER};
use reviewbox::{DocumentKind, PipelineConfig, ReviewOutcome, UploadedDocument};
use std::sync::Arc;
use support::{build_zip, file_count, service_with};
use tempfile::TempDir;

fn completed(outcome: ReviewOutcome) -> reviewbox::PipelineReport {
    match outcome {
        ReviewOutcome::Completed(output) => output,
        other => panic!("Expected a completed review, got {:?}", other),
    }
}

#[tokio::test]
async fn test_generic_text_review_and_dispose() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    oracle.add_response(MockResponse::text("1. Rename `x` to something meaningful"));
    let service = service_with(oracle.clone(), dir.path(), PipelineConfig::default());

    let doc = UploadedDocument::new("script.py", b"x = 1\nprint(x)\n".to_vec());
    let outcome = service.review(&doc).await.unwrap();
    assert_eq!(
        outcome.notice(),
        "Your file has been processed, the results are attached."
    );

    let mut output = completed(outcome);
    assert_eq!(output.kind, DocumentKind::GenericText);
    assert_eq!(output.results.len(), 1);

    let path = output.report.path().to_path_buf();
    assert!(path.exists());
    assert_eq!(
        output.report.read_to_string().unwrap(),
        "Processing result:\n1. Rename `x` to something meaningful"
    );

    let prompt = &oracle.prompts()[0];
    assert!(prompt.contains("x = 1\nprint(x)"));

    assert!(output.report.dispose().unwrap());
    assert!(!path.exists());
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_archive_one_result_per_chunk_in_order() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    oracle.add_responses(vec![
        MockResponse::text("first chunk ok"),
        MockResponse::text("second chunk ok"),
        MockResponse::text("third chunk ok"),
    ]);
    let service = service_with(oracle.clone(), dir.path(), PipelineConfig::default());

    let body = "y".repeat(800);
    let archive = build_zip(&[
        ("one.rs", body.as_bytes()),
        ("two.rs", body.as_bytes()),
        ("three.rs", body.as_bytes()),
    ]);
    let doc = UploadedDocument::new("sources.zip", archive);

    let output = completed(service.review(&doc).await.unwrap());

    assert_eq!(output.kind, DocumentKind::Archive);
    assert_eq!(oracle.call_count(), 3);
    assert_eq!(output.results.len(), 3);
    assert_eq!(output.failures(), 0);

    let report = output.report.read_to_string().unwrap();
    assert_eq!(report.matches(ARCHIVE_HEADER).count(), 3);
    let first = report.find("first chunk ok").unwrap();
    let second = report.find("second chunk ok").unwrap();
    let third = report.find("third chunk ok").unwrap();
    assert!(first < second && second < third);

    let prompts = oracle.prompts();
    assert!(prompts[0].contains("File one.rs:"));
    assert!(prompts[1].contains("File two.rs:"));
    assert!(prompts[2].contains("File three.rs:"));
}

#[tokio::test]
async fn test_small_entries_share_a_chunk() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    oracle.add_response(MockResponse::text("all good"));
    let service = service_with(oracle.clone(), dir.path(), PipelineConfig::default());

    let archive = build_zip(&[
        ("a.txt", "alpha".as_bytes()),
        ("dir/", "".as_bytes()),
        ("b.txt", "beta".as_bytes()),
    ]);
    let doc = UploadedDocument::new("small.ZIP", archive);

    let output = completed(service.review(&doc).await.unwrap());

    assert_eq!(oracle.call_count(), 1);
    assert_eq!(output.results.len(), 1);
    let prompt = &oracle.prompts()[0];
    let a = prompt.find("File a.txt:\nalpha").unwrap();
    let b = prompt.find("File b.txt:\nbeta").unwrap();
    assert!(a < b);
}

#[tokio::test]
async fn test_oracle_failure_is_report_content() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    oracle.add_responses(vec![
        MockResponse::error(BackendError::NetworkError {
            message: "connection refused".to_string(),
        }),
        MockResponse::text("second chunk fine"),
    ]);
    let service = service_with(
        oracle.clone(),
        dir.path(),
        PipelineConfig::default().with_max_chunk_size(200),
    );

    let body = "z".repeat(150);
    let archive = build_zip(&[("x.py", body.as_bytes()), ("y.py", body.as_bytes())]);
    let doc = UploadedDocument::new("mixed.zip", archive);

    let output = completed(service.review(&doc).await.unwrap());

    assert_eq!(output.results.len(), 2);
    assert_eq!(output.failures(), 1);
    assert!(!output.results[0].is_success());
    assert!(output.results[1].is_success());

    let report = output.report.read_to_string().unwrap();
    assert!(report.contains("Oracle request failed"));
    assert!(report.contains("connection refused"));
    assert!(report.contains("second chunk fine"));
}

#[tokio::test]
async fn test_csv_validation_skips_oracle() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    let service = service_with(oracle.clone(), dir.path(), PipelineConfig::default());

    let doc = UploadedDocument::new("people.csv", b"name,age\nann,\nbob,31\n".to_vec());
    let output = completed(service.review(&doc).await.unwrap());

    assert_eq!(output.kind, DocumentKind::Tabular);
    assert_eq!(oracle.call_count(), 0);
    assert!(output.results.is_empty());
    assert_eq!(output.report.path().extension().unwrap(), "md");

    let report = output.report.read_to_string().unwrap();
    assert!(report.starts_with(CSV_HEADER));
    assert!(report.contains("Column age contains missing values."));
}

#[tokio::test]
async fn test_json_validation_reports_non_objects() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    let service = service_with(oracle.clone(), dir.path(), PipelineConfig::default());

    let doc = UploadedDocument::new("rows.json", br#"[{"a": 1}, 5]"#.to_vec());
    let output = completed(service.review(&doc).await.unwrap());

    assert_eq!(output.kind, DocumentKind::Structured);
    assert_eq!(oracle.call_count(), 0);

    let report = output.report.read_to_string().unwrap();
    assert!(report.starts_with(JSON_HEADER));
    assert!(report.contains("Entry at position 2 is not an object."));
}

#[tokio::test]
async fn test_clean_json_reports_no_errors() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    let service = service_with(oracle, dir.path(), PipelineConfig::default());

    let doc = UploadedDocument::new(
        "rows.json",
        br#"[{"a": 1, "b": "x"}, {"a": 2, "b": "y"}]"#.to_vec(),
    );
    let output = completed(service.review(&doc).await.unwrap());

    let report = output.report.read_to_string().unwrap();
    assert!(report.contains("No errors found in JSON data."));
}

#[tokio::test]
async fn test_report_removed_when_output_dropped() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    oracle.add_response(MockResponse::text("fine"));
    let service = service_with(oracle, dir.path(), PipelineConfig::default());

    let doc = UploadedDocument::new("notes.txt", b"hello".to_vec());
    let output = completed(service.review(&doc).await.unwrap());
    let path = output.report.path().to_path_buf();
    assert!(path.exists());

    drop(output);
    assert!(!path.exists());
    assert_eq!(file_count(dir.path()), 0);
}

#[tokio::test]
async fn test_concurrent_requests_get_distinct_reports() {
    let dir = TempDir::new().unwrap();
    let oracle = Arc::new(MockOracle::new());
    oracle.add_responses(vec![MockResponse::text("a"), MockResponse::text("b")]);
    let service = service_with(oracle, dir.path(), PipelineConfig::default());

    let first = UploadedDocument::new("one.txt", b"one".to_vec());
    let second = UploadedDocument::new("two.txt", b"two".to_vec());
    let (a, b) = tokio::join!(service.review(&first), service.review(&second));

    let a = completed(a.unwrap());
    let b = completed(b.unwrap());
    assert_ne!(a.report.path(), b.report.path());
    assert_eq!(file_count(dir.path()), 2);
}
