//! Ranking scenarios: full search runs over freshly built indexes.

use std::path::Path;

use tempfile::TempDir;

use crate::common::{index_fox_collection, parse_output_line, write_topics};
use quarry::settings::IndexingMethod;
use quarry::{run_search, Error, ScoringFunction, SearchParams};

fn search(
    index_dir: &Path,
    topics_file: &Path,
    topic: Option<u32>,
    scoring: ScoringFunction,
) -> Result<Vec<String>, Error> {
    let mut out = Vec::new();
    run_search(
        &SearchParams {
            topics_file: topics_file.to_path_buf(),
            show: 1000,
            run_name: "testrun".to_string(),
            topic,
            debug: false,
            index_dir: index_dir.to_path_buf(),
            scoring,
        },
        &mut out,
    )?;
    Ok(String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect())
}

/// S3: exact TF-IDF scores for topic 400 "lazy dog".
#[test]
fn test_tf_idf_ranking() {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    index_fox_collection(work.path(), index_dir.path(), IndexingMethod::Spimi);
    let topics = write_topics(work.path(), &[(400, "lazy dog")]);

    let lines = search(
        index_dir.path(),
        &topics,
        None,
        ScoringFunction::TfIdf,
    )
    .unwrap();

    // D1 contains neither term and must be absent.
    assert_eq!(lines.len(), 2);

    let idf = (3.0f64 / 2.0).ln();
    let expected_d3 = 3.0f64.ln() * idf + 2.0f64.ln() * idf;
    let expected_d2 = 2.0 * 2.0f64.ln() * idf;

    let (topic, docno, rank, score, run) = parse_output_line(&lines[0]);
    assert_eq!((topic, docno.as_str(), rank, run.as_str()), (400, "D3", 0, "testrun"));
    assert!((score - expected_d3).abs() < 1e-9);

    let (_, docno, rank, score, _) = parse_output_line(&lines[1]);
    assert_eq!((docno.as_str(), rank), ("D2", 1));
    assert!((score - expected_d2).abs() < 1e-9);
}

/// S4: BM25 with b = 0 ranks by term frequency alone.
#[test]
fn test_bm25_boundary_b_zero() {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    index_fox_collection(work.path(), index_dir.path(), IndexingMethod::Simple);
    let topics = write_topics(work.path(), &[(401, "the")]);

    let lines = search(
        index_dir.path(),
        &topics,
        None,
        ScoringFunction::Bm25 { b: 0.0, k1: 1.5 },
    )
    .unwrap();

    // "the" occurs in D1 (tf 1) and D2 (tf 2); D3 is absent.
    assert_eq!(lines.len(), 2);

    let idf = (3.0f64 / 2.0).ln();
    let score_for = |tf: f64| idf * tf * 2.5 / (tf + 1.5);

    let (_, docno, _, score, _) = parse_output_line(&lines[0]);
    assert_eq!(docno, "D2");
    assert!((score - score_for(2.0)).abs() < 1e-9);

    let (_, docno, _, score, _) = parse_output_line(&lines[1]);
    assert_eq!(docno, "D1");
    assert!((score - score_for(1.0)).abs() < 1e-9);
}

/// S5: BM25VA end to end; the document with the higher tf still wins here,
/// and every emitted score is finite.
#[test]
fn test_bm25va_run() {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    index_fox_collection(work.path(), index_dir.path(), IndexingMethod::Spimi);
    let topics = write_topics(work.path(), &[(402, "lazy")]);

    let lines = search(
        index_dir.path(),
        &topics,
        None,
        ScoringFunction::Bm25Va { k1: 1.5 },
    )
    .unwrap();

    assert_eq!(lines.len(), 2);
    let (_, first, _, score_first, _) = parse_output_line(&lines[0]);
    let (_, second, _, score_second, _) = parse_output_line(&lines[1]);
    assert_eq!(first, "D3");
    assert_eq!(second, "D2");
    assert!(score_first.is_finite() && score_second.is_finite());
    assert!(score_first > score_second);
}

/// S6: a requested topic absent from the topic file is the exit-1 error.
#[test]
fn test_missing_topic_is_exit_one() {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    index_fox_collection(work.path(), index_dir.path(), IndexingMethod::Simple);
    let topics = write_topics(work.path(), &[(400, "lazy dog")]);

    let err = search(
        index_dir.path(),
        &topics,
        Some(999),
        ScoringFunction::TfIdf,
    )
    .unwrap_err();

    assert!(matches!(err, Error::TopicNotFound { topic: 999 }));
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().contains("999"));
}

/// The `--topic` filter restricts output to the selected topic.
#[test]
fn test_topic_filter() {
    let work = TempDir::new().unwrap();
    let index_dir = TempDir::new().unwrap();
    index_fox_collection(work.path(), index_dir.path(), IndexingMethod::Simple);
    let topics = write_topics(work.path(), &[(400, "lazy dog"), (401, "the")]);

    let lines = search(
        index_dir.path(),
        &topics,
        Some(401),
        ScoringFunction::TfIdf,
    )
    .unwrap();

    assert!(!lines.is_empty());
    for line in &lines {
        let (topic, _, _, _, _) = parse_output_line(line);
        assert_eq!(topic, 401);
    }
}

/// All three layouts produce the same ranked document order.
#[test]
fn test_layouts_rank_identically() {
    let mut rankings = Vec::new();

    for method in [
        IndexingMethod::Simple,
        IndexingMethod::Spimi,
        IndexingMethod::MapReduce,
    ] {
        let work = TempDir::new().unwrap();
        let index_dir = TempDir::new().unwrap();
        index_fox_collection(work.path(), index_dir.path(), method);
        let topics = write_topics(work.path(), &[(400, "lazy dog")]);

        let lines = search(
            index_dir.path(),
            &topics,
            None,
            ScoringFunction::TfIdf,
        )
        .unwrap();
        let docnos: Vec<String> = lines
            .iter()
            .map(|line| parse_output_line(line).1)
            .collect();
        rankings.push(docnos);
    }

    assert_eq!(rankings[0], rankings[1]);
    assert_eq!(rankings[0], rankings[2]);
}

/// Searching an index directory that was never built is the settings error.
#[test]
fn test_search_without_index_is_fatal() {
    let work = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    let topics = write_topics(work.path(), &[(400, "lazy dog")]);

    let err = search(empty.path(), &topics, None, ScoringFunction::TfIdf).unwrap_err();
    assert!(matches!(err, Error::SettingsMissing { .. }));
    assert!(err.to_string().contains("indexing must complete"));
}
