//! The remote API as seen by the resilience core.

use std::time::Duration;

use futures::future::BoxFuture;
use tavily_async::config::Config;
use tavily_async::types::{
    CrawlRequest, CrawlResponse, ExtractRequest, ExtractResponse, MapRequest, MapResponse,
    SearchRequest, SearchResponse, UsageResponse,
};
use tavily_async::{Client, TavilyError};

/// One HTTP call per method, bounded by `timeout`, no retries.
///
/// Implemented by [`tavily_async::Client`]; tests substitute scripted stubs.
pub trait SearchApi: Send + Sync {
    /// `POST /search`
    fn search<'a>(
        &'a self,
        req: &'a SearchRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<SearchResponse, TavilyError>>;

    /// `POST /extract`
    fn extract<'a>(
        &'a self,
        req: &'a ExtractRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<ExtractResponse, TavilyError>>;

    /// `POST /crawl`
    fn crawl<'a>(
        &'a self,
        req: &'a CrawlRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<CrawlResponse, TavilyError>>;

    /// `POST /map`
    fn map<'a>(
        &'a self,
        req: &'a MapRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<MapResponse, TavilyError>>;

    /// `GET /usage`
    fn usage(&self, timeout: Duration) -> BoxFuture<'_, Result<UsageResponse, TavilyError>>;
}

impl<C: Config> SearchApi for Client<C> {
    fn search<'a>(
        &'a self,
        req: &'a SearchRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<SearchResponse, TavilyError>> {
        Box::pin(async move { Client::search(self).create(req, timeout).await })
    }

    fn extract<'a>(
        &'a self,
        req: &'a ExtractRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<ExtractResponse, TavilyError>> {
        Box::pin(async move { Client::extract(self).create(req, timeout).await })
    }

    fn crawl<'a>(
        &'a self,
        req: &'a CrawlRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<CrawlResponse, TavilyError>> {
        Box::pin(async move { Client::crawl(self).create(req, timeout).await })
    }

    fn map<'a>(
        &'a self,
        req: &'a MapRequest,
        timeout: Duration,
    ) -> BoxFuture<'a, Result<MapResponse, TavilyError>> {
        Box::pin(async move { Client::map(self).create(req, timeout).await })
    }

    fn usage(&self, timeout: Duration) -> BoxFuture<'_, Result<UsageResponse, TavilyError>> {
        Box::pin(async move { Client::usage(self).get(timeout).await })
    }
}
