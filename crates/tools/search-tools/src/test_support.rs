//! Scripted [`SearchApi`] for exercising the core without a network.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tavily_async::types::{
    CrawlRequest, CrawlResponse, ExtractRequest, ExtractResponse, MapRequest, MapResponse,
    SearchRequest, SearchResponse, UsageResponse,
};
use tavily_async::{ApiErrorObject, ConnectionFailure, TavilyError};

use crate::remote::SearchApi;

/// What the next call returns.
#[derive(Debug)]
pub enum Reply {
    /// Deserialized into the endpoint's response type
    Ok(Value),
    /// Returned as-is
    Err(TavilyError),
    /// Never completes
    Hang,
}

/// A call the stub received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// `search`, `extract`, `crawl`, `map` or `usage`
    pub endpoint: &'static str,
    /// Request body as JSON
    pub body: Value,
    /// Timeout the caller passed
    pub timeout: Duration,
}

/// Replies in script order and records every call.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedApi {
    /// Empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful reply.
    #[must_use]
    pub fn ok(self, body: Value) -> Self {
        self.push(Reply::Ok(body))
    }

    /// Queue a failure.
    #[must_use]
    pub fn err(self, e: TavilyError) -> Self {
        self.push(Reply::Err(e))
    }

    /// Queue a call that never returns.
    #[must_use]
    pub fn hang(self) -> Self {
        self.push(Reply::Hang)
    }

    fn push(self, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn answer<T: DeserializeOwned + Send + 'static>(
        &self,
        endpoint: &'static str,
        body: &impl Serialize,
        timeout: Duration,
    ) -> BoxFuture<'static, Result<T, TavilyError>> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                endpoint,
                body: serde_json::to_value(body).unwrap_or(Value::Null),
                timeout,
            });
        let reply = self
            .replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();
        Box::pin(async move {
            match reply {
                Some(Reply::Ok(v)) => {
                    serde_json::from_value(v).map_err(|e| TavilyError::Serde(e.to_string()))
                }
                Some(Reply::Err(e)) => Err(e),
                Some(Reply::Hang) => futures::future::pending().await,
                None => Err(TavilyError::Serde(format!(
                    "no scripted reply for {endpoint}"
                ))),
            }
        })
    }
}

impl SearchApi for ScriptedApi {
    fn search<'a>(
        &'a self,
        req: &'a SearchRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<SearchResponse, TavilyError>> {
        self.answer("search", req, timeout)
    }

    fn extract<'a>(
        &'a self,
        req: &'a ExtractRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<ExtractResponse, TavilyError>> {
        self.answer("extract", req, timeout)
    }

    fn crawl<'a>(
        &'a self,
        req: &'a CrawlRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<CrawlResponse, TavilyError>> {
        self.answer("crawl", req, timeout)
    }

    fn map<'a>(
        &'a self,
        req: &'a MapRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<MapResponse, TavilyError>> {
        self.answer("map", req, timeout)
    }

    fn usage(&self, timeout: Duration) -> BoxFuture<'_, Result<UsageResponse, TavilyError>> {
        self.answer("usage", &Value::Null, timeout)
    }
}

/// Connection refused before the request was sent.
#[must_use]
pub fn refused() -> TavilyError {
    TavilyError::Connection {
        kind: ConnectionFailure::Refused,
        message: "tcp connect error: Connection refused (os error 111)".into(),
    }
}

/// Connection reset mid-request.
#[must_use]
pub fn reset() -> TavilyError {
    TavilyError::Connection {
        kind: ConnectionFailure::Reset,
        message: "connection reset by peer".into(),
    }
}

/// Planned timeout elapsed.
#[must_use]
pub fn timed_out() -> TavilyError {
    TavilyError::Timeout(Duration::from_secs(15))
}

/// API error with the given status.
#[must_use]
pub fn api_error(status: u16, message: &str) -> TavilyError {
    TavilyError::Api(ApiErrorObject {
        status_code: Some(status),
        message: message.into(),
        error: None,
    })
}

/// A `/search` body with `n` numbered results.
#[must_use]
pub fn search_body(query: &str, n: usize) -> Value {
    let results: Vec<Value> = (1..=n)
        .map(|i| {
            json!({
                "title": format!("Result {i}"),
                "url": format!("https://example.com/{i}"),
                "content": format!("Snippet {i} about {query}"),
                "score": 1.0 / i as f64,
            })
        })
        .collect();
    json!({ "query": query, "results": results, "images": [] })
}
