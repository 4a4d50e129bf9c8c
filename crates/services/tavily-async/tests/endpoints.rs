use std::time::Duration;

use tavily_async::types::{CrawlRequest, ExtractDepth, ExtractRequest, MapRequest};
use tavily_async::{Client, TavilyConfig};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn test_client(server: &MockServer) -> Client<TavilyConfig> {
    Client::with_config(
        TavilyConfig::new()
            .with_api_base(server.uri())
            .with_api_key("tvly-test-key"),
    )
}

#[tokio::test]
async fn extract_reports_failed_urls() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/extract"))
        .and(body_partial_json(serde_json::json!({
            "urls": ["https://docs.rs/tokio", "https://nope.invalid"],
            "extract_depth": "advanced"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"url": "https://docs.rs/tokio", "raw_content": "# tokio", "images": []}],
            "failed_results": [{"url": "https://nope.invalid", "error": "could not resolve"}],
            "response_time": 0.8
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut req = ExtractRequest::new(vec![
        "https://docs.rs/tokio".into(),
        "https://nope.invalid".into(),
    ]);
    req.extract_depth = Some(ExtractDepth::Advanced);

    let resp = test_client(&server)
        .extract()
        .create(&req, TIMEOUT)
        .await
        .unwrap();

    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.results[0].raw_content, "# tokio");
    assert_eq!(resp.failed_results.len(), 1);
    assert_eq!(
        resp.failed_results[0].error.as_deref(),
        Some("could not resolve")
    );
}

#[tokio::test]
async fn crawl_and_map_parse() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/crawl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "base_url": "https://tokio.rs",
            "results": [
                {"url": "https://tokio.rs/tokio/tutorial", "raw_content": "Tutorial"},
                {"url": "https://tokio.rs/blog", "raw_content": "Blog"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/map"))
        .and(body_partial_json(serde_json::json!({"url": "https://tokio.rs", "limit": 10})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "base_url": "https://tokio.rs",
            "results": ["https://tokio.rs/", "https://tokio.rs/blog"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server);

    let crawl = client
        .crawl()
        .create(&CrawlRequest::new("https://tokio.rs"), TIMEOUT)
        .await
        .unwrap();
    assert_eq!(crawl.results.len(), 2);
    assert_eq!(crawl.base_url, "https://tokio.rs");

    let mut map_req = MapRequest::new("https://tokio.rs");
    map_req.limit = Some(10);
    let map = client.map().create(&map_req, TIMEOUT).await.unwrap();
    assert_eq!(map.results, vec!["https://tokio.rs/", "https://tokio.rs/blog"]);
}

#[tokio::test]
async fn usage_probe_uses_get_with_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/usage"))
        .and(header("authorization", "Bearer tvly-test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "key": {"usage": 10, "limit": 1000},
            "account": {"current_plan": "Bootstrap", "plan_usage": 10, "plan_limit": 1000}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let usage = test_client(&server).usage().get(TIMEOUT).await.unwrap();
    assert_eq!(usage.remaining_plan_credits(), Some(990));
}
