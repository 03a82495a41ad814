//! Integration tests running full queries against a mocked GitHub API.

use std::time::Duration;

use gitql_api::client::GithubClient;
use gitql_engine::query::{EvalError, ParseError};
use gitql_engine::source::{SelectionState, SourceError};
use gitql_engine::{Datum, Engine, EngineConfig, GithubOrigin, QueryError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(server: &MockServer, config: EngineConfig) -> Engine<GithubOrigin> {
    let client = GithubClient::builder()
        .base_url(server.uri())
        .initial_backoff(Duration::from_secs(0))
        .build()
        .unwrap();
    Engine::with_config(GithubOrigin::new(client), config)
}

fn repo_json(name: &str, stars: u64) -> serde_json::Value {
    serde_json::json!({
        "id": stars + 1000,
        "name": name,
        "full_name": format!("octocat/{}", name),
        "owner": { "login": "octocat", "id": 1 },
        "private": false,
        "fork": false,
        "language": "Rust",
        "stargazers_count": stars,
        "topics": [],
        "created_at": "2020-01-01T00:00:00Z"
    })
}

fn issue_json(number: u64, comments: u64) -> serde_json::Value {
    serde_json::json!({
        "id": number * 10,
        "number": number,
        "title": format!("Issue {}", number),
        "state": if number % 2 == 0 { "closed" } else { "open" },
        "user": { "login": "octocat", "id": 1 },
        "labels": [{ "name": "bug" }],
        "comments": comments,
        "created_at": "2024-01-01T00:00:00Z"
    })
}

async fn mount_repository(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello"))
        .respond_with(ResponseTemplate::new(200).set_body_json(repo_json("hello", 5)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_issue_page(server: &MockServer, page: u32, per_page: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/issues"))
        .and(query_param("state", "all"))
        .and(query_param("page", page.to_string()))
        .and(query_param("per_page", per_page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_filtered_issue_query() {
    let server = MockServer::start().await;
    mount_repository(&server, 1).await;
    mount_issue_page(
        &server,
        1,
        100,
        serde_json::json!([
            issue_json(1, 0),
            issue_json(2, 5),
            issue_json(3, 1),
            issue_json(4, 9),
            issue_json(5, 12)
        ]),
    )
    .await;

    let mut engine = engine(&server, EngineConfig::default());
    let output = engine
        .execute("SELECT number, title FROM octocat.hello.issues WHERE comments > 2 LIMIT 2;")
        .await
        .unwrap();

    assert_eq!(output.columns, vec!["number", "title"]);
    assert_eq!(output.len(), 2);
    assert_eq!(output.records[0].get("number"), Some(&Datum::Integer(2)));
    assert_eq!(
        output.records[1].get("title"),
        Some(&Datum::Text("Issue 4".into()))
    );
    assert_eq!(output.records[0].get("comments"), None);
    assert_eq!(output.state, SelectionState::Done);
    assert_eq!(output.evaluated, 4);
    assert_eq!(output.populate_count, 1);
}

#[tokio::test]
async fn test_text_filter_and_default_limit() {
    let server = MockServer::start().await;
    mount_repository(&server, 1).await;
    let issues: Vec<serde_json::Value> = (1..=30).map(|n| issue_json(n, n)).collect();
    mount_issue_page(&server, 1, 100, serde_json::Value::Array(issues)).await;

    let mut engine = engine(&server, EngineConfig::default());
    let output = engine
        .execute("SELECT number FROM octocat.hello.issues WHERE state = 'closed'")
        .await
        .unwrap();

    assert_eq!(output.len(), 1);
    assert_eq!(output.records[0].get("number"), Some(&Datum::Integer(2)));
    assert_eq!(output.state, SelectionState::Done);
    assert_eq!(output.evaluated, 2);
}

#[tokio::test]
async fn test_configured_default_limit() {
    let server = MockServer::start().await;
    mount_repository(&server, 1).await;
    let issues: Vec<serde_json::Value> = (1..=30).map(|n| issue_json(n, n)).collect();
    mount_issue_page(&server, 1, 100, serde_json::Value::Array(issues)).await;

    let config = EngineConfig {
        default_limit: 10,
        ..EngineConfig::default()
    };
    let mut engine = engine(&server, config);
    let output = engine
        .execute("SELECT number FROM octocat.hello.issues WHERE state = 'open'")
        .await
        .unwrap();

    let numbers: Vec<&Datum> = output
        .records
        .iter()
        .filter_map(|r| r.get("number"))
        .collect();
    assert_eq!(numbers.len(), 10);
    assert_eq!(numbers[0], &Datum::Integer(1));
    assert_eq!(numbers[9], &Datum::Integer(19));
}

#[tokio::test]
async fn test_source_resolution_is_cached_between_queries() {
    let server = MockServer::start().await;
    mount_repository(&server, 1).await;
    mount_issue_page(&server, 1, 100, serde_json::json!([issue_json(1, 0)])).await;

    let mut engine = engine(&server, EngineConfig::default());
    engine
        .execute("SELECT * FROM octocat.hello.issues")
        .await
        .unwrap();
    engine
        .execute("SELECT title FROM OCTOCAT.HELLO.ISSUES LIMIT 1")
        .await
        .unwrap();

    assert_eq!(engine.origin().cache().len(), 1);
    assert_eq!(engine.origin().cache().stats(), (1, 1));
}

#[tokio::test]
async fn test_small_pages_run_until_exhausted() {
    let server = MockServer::start().await;
    mount_repository(&server, 1).await;
    mount_issue_page(
        &server,
        1,
        2,
        serde_json::json!([issue_json(1, 0), issue_json(2, 0)]),
    )
    .await;
    mount_issue_page(&server, 2, 2, serde_json::json!([issue_json(3, 0)])).await;

    let config = EngineConfig {
        default_limit: 10,
        page_size: 2,
    };
    let mut engine = engine(&server, config);
    let output = engine
        .execute("SELECT number FROM octocat.hello.issues")
        .await
        .unwrap();

    assert_eq!(output.len(), 3);
    assert!(output.is_exhausted());
    assert_eq!(output.read_cursor, 3);
    assert_eq!(output.populate_count, 3);
}

#[tokio::test]
async fn test_select_all_repos_uses_field_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "login": "octocat",
            "id": 1,
            "type": "User"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            repo_json("alpha", 3),
            repo_json("beta", 40)
        ])))
        .mount(&server)
        .await;

    let mut engine = engine(&server, EngineConfig::default());
    let output = engine
        .execute("SELECT * FROM octocat.repos WHERE stargazers_count >= 10")
        .await
        .unwrap();

    assert_eq!(output.columns[0], "id");
    assert_eq!(output.columns.last().map(String::as_str), Some("updated_at"));
    assert_eq!(output.len(), 1);
    assert_eq!(
        output.records[0].names().collect::<Vec<_>>(),
        output.columns.iter().map(String::as_str).collect::<Vec<_>>()
    );
    assert_eq!(
        output.records[0].get("name"),
        Some(&Datum::Text("beta".into()))
    );
}

#[tokio::test]
async fn test_missing_repository_is_source_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({ "message": "Not Found" })),
        )
        .mount(&server)
        .await;

    let mut engine = engine(&server, EngineConfig::default());
    let err = engine
        .execute("SELECT * FROM octocat.missing.commits")
        .await
        .unwrap_err();

    match err {
        QueryError::Source(SourceError::NotFound { path, detail }) => {
            assert_eq!(path, "octocat.missing.commits");
            assert!(detail.contains("octocat/missing"));
        }
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_type_error_aborts_query_and_engine_recovers() {
    let server = MockServer::start().await;
    mount_repository(&server, 1).await;
    mount_issue_page(&server, 1, 100, serde_json::json!([issue_json(1, 3)])).await;

    let mut engine = engine(&server, EngineConfig::default());
    let err = engine
        .execute("SELECT * FROM octocat.hello.issues WHERE title > 3")
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::Eval(EvalError::TypeMismatch { .. })));
    assert!(err.is_type_error());

    let output = engine
        .execute("SELECT title FROM octocat.hello.issues WHERE comments = 3")
        .await
        .unwrap();
    assert_eq!(output.len(), 1);
}

#[tokio::test]
async fn test_compile_errors_make_no_requests() {
    let server = MockServer::start().await;
    let mut engine = engine(&server, EngineConfig::default());

    let err = engine
        .execute("SELECT * FROM octocat.repos ORDER BY name")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Parse(ParseError::UnsupportedClause { .. })
    ));

    let err = engine.execute("   ").await.unwrap_err();
    assert_eq!(err.to_string(), "tokenization error: Unspecified query");

    let received = server.received_requests().await.unwrap_or_default();
    assert!(received.is_empty());
}

#[tokio::test]
async fn test_fetch_failure_is_origin_error() {
    let server = MockServer::start().await;
    mount_repository(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/hello/pulls"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({ "message": "Server Error" })),
        )
        .mount(&server)
        .await;

    let mut engine = engine(&server, EngineConfig::default());
    let err = engine
        .execute("SELECT * FROM octocat.hello.pull_requests")
        .await
        .unwrap_err();

    assert!(matches!(err, QueryError::Origin(_)));
    assert_eq!(err.origin_error().map(|e| e.exit_code()), Some(2));
}
