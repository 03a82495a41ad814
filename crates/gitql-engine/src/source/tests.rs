//! Tests for source paths and the selection loop.

use gitql_api::{ApiError, Error};

use super::*;
use crate::error::QueryError;
use crate::origin::Origin;
use crate::query::{EvalError, Expression};
use crate::record::{Datum, Record};

// ==================== Test Helpers ====================

/// Serves a fixed list of records and remembers every fetch.
struct ScriptedOrigin {
    records: Vec<Record>,
    fetches: Vec<(usize, usize)>,
    /// 1-based fetch number that fails.
    fail_at: Option<usize>,
    /// Ignore `count` and return this many records per fetch.
    oversized_pages: Option<usize>,
}

impl ScriptedOrigin {
    fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            fetches: Vec::new(),
            fail_at: None,
            oversized_pages: None,
        }
    }

    fn numbered(total: usize) -> Self {
        Self::new(
            (0..total)
                .map(|n| {
                    Record::new()
                        .with("n", n as i64)
                        .with("even", n % 2 == 0)
                })
                .collect(),
        )
    }
}

impl Origin for ScriptedOrigin {
    type Handle = ();

    async fn resolve(&mut self, _path: &SourcePath) -> gitql_api::Result<()> {
        Ok(())
    }

    async fn fetch_page(
        &mut self,
        _handle: &(),
        offset: usize,
        count: usize,
    ) -> gitql_api::Result<Vec<Record>> {
        self.fetches.push((offset, count));
        if self.fail_at == Some(self.fetches.len()) {
            return Err(Error::Api(ApiError::Network {
                message: "connection reset".to_string(),
            }));
        }
        let count = self.oversized_pages.unwrap_or(count);
        Ok(self.records.iter().skip(offset).take(count).cloned().collect())
    }
}

fn numbers(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .map(|r| match r.get("n") {
            Some(Datum::Integer(n)) => *n,
            other => panic!("Expected integer n, got {:?}", other),
        })
        .collect()
}

fn even() -> Expression {
    Expression::field("even")
}

// ==================== Source paths ====================

#[test]
fn test_parse_owner_repos() {
    let path = SourcePath::parse("octocat.repos").unwrap();

    assert_eq!(path.owner, "octocat");
    assert_eq!(path.repo, None);
    assert_eq!(path.kind, SourceKind::Repos);
    assert_eq!(path.identifier(), "octocat");
    assert_eq!(path.to_string(), "octocat.repos");
}

#[test]
fn test_parse_repository_kinds() {
    for (text, kind) in [
        ("o.r.issues", SourceKind::Issues),
        ("o.r.pull_requests", SourceKind::PullRequests),
        ("o.r.COMMITS", SourceKind::Commits),
    ] {
        let path = SourcePath::parse(text).unwrap();
        assert_eq!(path.kind, kind);
        assert_eq!(path.identifier(), "o/r");
    }
}

#[test]
fn test_parse_dotted_repository_name() {
    let path: SourcePath = "socketio.socket.io.issues".parse().unwrap();

    assert_eq!(path.repo.as_deref(), Some("socket.io"));
    assert_eq!(path.to_string(), "socketio.socket.io.issues");
}

#[test]
fn test_parse_rejects_single_segment() {
    let err = SourcePath::parse("table1").unwrap_err();
    assert!(matches!(err, SourceError::Malformed { .. }));
}

#[test]
fn test_parse_rejects_empty_segment() {
    assert!(matches!(
        SourcePath::parse("octocat..issues").unwrap_err(),
        SourceError::Malformed { .. }
    ));
    assert!(matches!(
        SourcePath::parse(".repos").unwrap_err(),
        SourceError::Malformed { .. }
    ));
}

#[test]
fn test_parse_rejects_kind_at_wrong_depth() {
    let err = SourcePath::parse("octocat.issues").unwrap_err();
    assert_eq!(
        err.to_string(),
        "malformed source path 'octocat.issues': issues must be written as owner.repo.issues"
    );

    let err = SourcePath::parse("octocat.hello.repos").unwrap_err();
    assert!(matches!(err, SourceError::Malformed { .. }));
}

#[test]
fn test_parse_unknown_kind_suggests() {
    let err = SourcePath::parse("octocat.hello.isues").unwrap_err();
    assert_eq!(
        err,
        SourceError::UnknownKind {
            path: "octocat.hello.isues".into(),
            kind: "isues".into(),
            suggestion: Some("issues".into()),
        }
    );
    assert!(err.to_string().contains("did you mean 'issues'"));
}

#[test]
fn test_kind_fields() {
    assert!(SourceKind::Repos.has_field("stargazers_count"));
    assert!(!SourceKind::Repos.has_field("title"));
    assert!(SourceKind::Issues.has_field("is_pull_request"));
    assert!(SourceKind::PullRequests.has_field("merged_at"));
    assert_eq!(SourceKind::Commits.fields().len(), 5);
}

#[test]
fn test_kind_fields_come_from_listing_payloads() {
    // Each of these needs a follow-up request per row.
    assert!(!SourceKind::Repos.has_field("languages"));
    assert!(!SourceKind::Issues.has_field("closed_by"));
    assert!(!SourceKind::PullRequests.has_field("changed_files"));
    assert!(!SourceKind::Commits.has_field("files"));
}

// ==================== Selection loop ====================

#[tokio::test]
async fn test_limit_reached_within_first_page() {
    let mut origin = ScriptedOrigin::numbered(10);
    let mut source = RecordSource::new(&mut origin, (), 3, 5);
    source.run(None).await.unwrap();
    let selection = source.finish();

    assert_eq!(numbers(&selection.records), vec![0, 1, 2]);
    assert_eq!(selection.state, SelectionState::Done);
    assert_eq!(selection.populate_count, 1);
    assert_eq!(selection.read_cursor, 5);
    assert_eq!(selection.evaluated, 3);
    assert_eq!(origin.fetches, vec![(0, 5)]);
}

#[tokio::test]
async fn test_exhausted_source_terminates() {
    let mut origin = ScriptedOrigin::numbered(7);
    let mut source = RecordSource::new(&mut origin, (), 10, 3);
    source.run(None).await.unwrap();
    let selection = source.finish();

    assert_eq!(numbers(&selection.records), vec![0, 1, 2, 3, 4, 5, 6]);
    assert_eq!(selection.state, SelectionState::Exhausted);
    assert_eq!(selection.read_cursor, 7);
    assert_eq!(selection.populate_count, 4);
    assert_eq!(origin.fetches, vec![(0, 3), (3, 3), (6, 3), (7, 3)]);
}

#[tokio::test]
async fn test_empty_source_is_exhausted_after_one_fetch() {
    let mut origin = ScriptedOrigin::numbered(0);
    let mut source = RecordSource::new(&mut origin, (), 5, 100);
    source.run(Some(&even())).await.unwrap();
    let selection = source.finish();

    assert!(selection.records.is_empty());
    assert_eq!(selection.state, SelectionState::Exhausted);
    assert_eq!(selection.populate_count, 1);
    assert_eq!(selection.evaluated, 0);
}

#[tokio::test]
async fn test_filter_spans_pages() {
    let mut origin = ScriptedOrigin::numbered(20);
    let mut source = RecordSource::new(&mut origin, (), 4, 3);
    source.run(Some(&even())).await.unwrap();
    let selection = source.finish();

    assert_eq!(numbers(&selection.records), vec![0, 2, 4, 6]);
    assert_eq!(selection.state, SelectionState::Done);
    assert_eq!(selection.evaluated, 7);
    assert_eq!(selection.populate_count, 3);
    assert_eq!(origin.fetches, vec![(0, 3), (3, 3), (6, 3)]);
}

#[tokio::test]
async fn test_no_page_fetched_after_limit_met_at_page_end() {
    let mut origin = ScriptedOrigin::numbered(10);
    let mut source = RecordSource::new(&mut origin, (), 4, 2);
    source.run(None).await.unwrap();

    assert_eq!(source.state(), SelectionState::Done);
    assert_eq!(origin.fetches, vec![(0, 2), (2, 2)]);
}

#[tokio::test]
async fn test_selection_properties_hold_across_shapes() {
    for total in 0..12 {
        for page_size in 1..5 {
            for limit in 1..8 {
                let mut origin = ScriptedOrigin::numbered(total);
                let mut source = RecordSource::new(&mut origin, (), limit, page_size);
                source.run(Some(&even())).await.unwrap();
                let selection = source.finish();

                let expected: Vec<i64> = (0..total as i64).filter(|n| n % 2 == 0).take(limit).collect();
                let shape = format!("total={} page={} limit={}", total, page_size, limit);

                assert_eq!(numbers(&selection.records), expected, "{}", shape);
                assert!(selection.records.len() <= limit, "{}", shape);
                assert_eq!(selection.populate_count, origin.fetches.len(), "{}", shape);

                // The read cursor only moves forward.
                assert!(
                    origin.fetches.windows(2).all(|w| w[0].0 < w[1].0),
                    "{}",
                    shape
                );

                match selection.state {
                    SelectionState::Done => {
                        assert_eq!(selection.records.len(), limit, "{}", shape);
                        let last = *expected.last().unwrap() as usize;
                        assert_eq!(selection.evaluated, last + 1, "{}", shape);
                        // The last fetch is the one holding the last accepted row.
                        let (offset, _) = *origin.fetches.last().unwrap();
                        assert!(offset <= last && last < offset + page_size, "{}", shape);
                    }
                    SelectionState::Exhausted => {
                        assert!(selection.records.len() < limit, "{}", shape);
                        assert_eq!(selection.evaluated, total, "{}", shape);
                        assert_eq!(selection.read_cursor, total, "{}", shape);
                    }
                    other => panic!("{}: non-terminal state {:?}", shape, other),
                }
            }
        }
    }
}

#[tokio::test]
async fn test_fetch_error_stops_query() {
    let mut origin = ScriptedOrigin::numbered(10);
    origin.fail_at = Some(2);
    let mut source = RecordSource::new(&mut origin, (), 5, 3);
    let err = source.run(None).await.unwrap_err();

    assert!(matches!(err, QueryError::Origin(_)));
    assert_eq!(numbers(source.accepted()), vec![0, 1, 2]);
    assert_eq!(source.read_cursor(), 3);
}

#[tokio::test]
async fn test_evaluation_error_stops_query() {
    let mut origin = ScriptedOrigin::numbered(10);
    let mut source = RecordSource::new(&mut origin, (), 5, 3);
    let err = source
        .run(Some(&Expression::field("missing")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        QueryError::Eval(EvalError::UnknownField { .. })
    ));
    assert_eq!(origin.fetches.len(), 1);
}

#[tokio::test]
async fn test_manual_stepping() {
    let mut origin = ScriptedOrigin::numbered(3);
    let mut source = RecordSource::new(&mut origin, (), 2, 2);

    assert_eq!(source.state(), SelectionState::Empty);
    assert_eq!(source.current(), None);

    assert_eq!(source.populate().await.unwrap(), 2);
    assert_eq!(source.state(), SelectionState::Active);
    assert_eq!(source.current().and_then(|r| r.get("n")), Some(&Datum::Integer(0)));

    source.advance().await.unwrap();
    assert_eq!(source.row_cursor(), 1);

    // Accepting the last buffered row triggers a refill.
    source.select_current().await.unwrap();
    assert_eq!(source.state(), SelectionState::Active);
    assert_eq!(source.populate_count(), 2);
    assert_eq!(source.row_cursor(), 0);
    assert_eq!(source.buffered(), 1);
    assert_eq!(source.current().and_then(|r| r.get("n")), Some(&Datum::Integer(2)));

    source.select_current().await.unwrap();
    assert_eq!(source.state(), SelectionState::Done);
    assert_eq!(numbers(source.accepted()), vec![1, 2]);

    // Stepping a finished source is a no-op.
    source.advance().await.unwrap();
    assert_eq!(source.state(), SelectionState::Done);
    assert_eq!(source.populate_count(), 2);
}

#[tokio::test]
async fn test_oversized_page_is_truncated() {
    let mut origin = ScriptedOrigin::numbered(10);
    origin.oversized_pages = Some(10);
    let mut source = RecordSource::new(&mut origin, (), 10, 4);
    source.run(None).await.unwrap();
    let selection = source.finish();

    assert_eq!(numbers(&selection.records), (0..10).collect::<Vec<_>>());
    assert_eq!(origin.fetches, vec![(0, 4), (4, 4), (8, 4), (10, 4)]);
}

#[tokio::test]
async fn test_zero_limit_and_page_size_are_raised_to_one() {
    let mut origin = ScriptedOrigin::numbered(5);
    let mut source = RecordSource::new(&mut origin, (), 0, 0);
    source.run(None).await.unwrap();
    let selection = source.finish();

    assert_eq!(numbers(&selection.records), vec![0]);
    assert_eq!(origin.fetches, vec![(0, 1)]);
}

#[tokio::test]
async fn test_query_without_limit_returns_one_row() {
    let mut engine = crate::Engine::new(ScriptedOrigin::numbered(50));
    let output = engine.execute("SELECT * FROM o.r.commits").await.unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output.state, SelectionState::Done);
    assert_eq!(engine.origin().fetches, vec![(0, 100)]);
}
