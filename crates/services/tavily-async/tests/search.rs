use std::time::Duration;

use serial_test::serial;
use tavily_async::test_support::EnvGuard;
use tavily_async::types::{SearchDepth, SearchRequest, Topic};
use tavily_async::{Client, ConnectionFailure, TavilyConfig, TavilyError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn test_client(server: &MockServer) -> Client<TavilyConfig> {
    let config = TavilyConfig::new()
        .with_api_base(server.uri())
        .with_api_key("tvly-test-key");
    Client::with_config(config)
}

fn mock_search_response() -> serde_json::Value {
    serde_json::json!({
        "query": "who maintains tokio",
        "answer": "Tokio is maintained by the tokio-rs organization.",
        "images": [],
        "results": [
            {
                "title": "Tokio - An asynchronous Rust runtime",
                "url": "https://tokio.rs/",
                "content": "Tokio is an asynchronous runtime for the Rust programming language.",
                "score": 0.93,
                "raw_content": null,
                "favicon": "https://tokio.rs/favicon.ico"
            }
        ],
        "response_time": 1.42,
        "request_id": "req-123"
    })
}

#[tokio::test]
async fn search_success_parses() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(header("authorization", "Bearer tvly-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mock_search_response()))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let req = SearchRequest::new("who maintains tokio")
        .with_max_results(5)
        .with_answer(true);
    let resp = client.search().create(&req, TIMEOUT).await.unwrap();

    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.results[0].url, "https://tokio.rs/");
    assert!((resp.results[0].score - 0.93).abs() < f64::EPSILON);
    assert_eq!(
        resp.results[0].favicon.as_deref(),
        Some("https://tokio.rs/favicon.ico")
    );
    assert!(resp.answer.unwrap().contains("tokio-rs"));
    assert_eq!(resp.request_id.as_deref(), Some("req-123"));
}

#[tokio::test]
async fn search_request_body_is_snake_case() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .and(body_partial_json(serde_json::json!({
            "query": "rust async",
            "topic": "news",
            "search_depth": "advanced",
            "max_results": 7,
            "days": 3
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let mut req = SearchRequest::new("rust async")
        .with_topic(Topic::News)
        .with_search_depth(SearchDepth::Advanced)
        .with_max_results(7);
    req.days = Some(3);

    let resp = client.search().create(&req, TIMEOUT).await.unwrap();
    assert!(resp.results.is_empty());
}

#[tokio::test]
async fn unauthorized_maps_to_api_error_with_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "detail": {"error": "Unauthorized: missing or invalid API key."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .search()
        .create(&SearchRequest::new("q"), TIMEOUT)
        .await
        .unwrap_err();

    match err {
        TavilyError::Api(obj) => {
            assert_eq!(obj.status_code, Some(401));
            assert!(obj.message.contains("invalid API key"));
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn plan_limit_status_is_preserved() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(432).set_body_json(serde_json::json!({
            "detail": {"error": "This request exceeds your plan's set usage limit."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .search()
        .create(&SearchRequest::new("q"), TIMEOUT)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(432));
}

#[tokio::test]
async fn client_never_retries_on_its_own() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .search()
        .create(&SearchRequest::new("q"), TIMEOUT)
        .await
        .unwrap_err();

    match err {
        TavilyError::Api(obj) => {
            assert_eq!(obj.status_code, Some(500));
            assert_eq!(obj.message, "Internal Server Error");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn slow_response_becomes_timeout_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = test_client(&server);
    let err = client
        .search()
        .create(&SearchRequest::new("q"), Duration::from_millis(50))
        .await
        .unwrap_err();

    assert!(
        matches!(err, TavilyError::Timeout(d) if d == Duration::from_millis(50)),
        "got {err:?}"
    );
}

#[tokio::test]
async fn refused_connection_is_classified() {
    // Bind and drop a listener so the port is known to be closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let client = Client::with_config(
        TavilyConfig::new()
            .with_api_base(format!("http://127.0.0.1:{port}"))
            .with_api_key("k"),
    );

    let err = client
        .search()
        .create(&SearchRequest::new("q"), TIMEOUT)
        .await
        .unwrap_err();

    match err {
        TavilyError::Connection { kind, .. } => {
            assert!(matches!(
                kind,
                ConnectionFailure::Refused | ConnectionFailure::Connect
            ));
            assert!(!kind.is_transient());
        }
        other => panic!("Expected Connection error, got {other:?}"),
    }
}

#[tokio::test]
#[serial(env)]
async fn missing_api_key_is_config_error() {
    let _env = EnvGuard::new().remove("TAVILY_API_KEY");

    let client = Client::with_config(TavilyConfig::new().with_api_base("http://localhost:1234"));
    let err = client
        .search()
        .create(&SearchRequest::new("q"), TIMEOUT)
        .await
        .unwrap_err();

    match err {
        TavilyError::Config(msg) => assert!(msg.contains("TAVILY_API_KEY")),
        other => panic!("Expected Config error, got {other:?}"),
    }
}
