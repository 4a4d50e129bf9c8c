use std::time::Duration;

use crate::{
    client::Client,
    config::Config,
    error::TavilyError,
    types::crawl::{CrawlRequest, CrawlResponse},
};

/// API resource for the `/crawl` endpoint
pub struct Crawl<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Crawl<'c, C> {
    /// Creates a new Crawl resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Crawl a site from its root URL
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, exceeds `timeout`, or the API returns an error.
    pub async fn create(
        &self,
        req: &CrawlRequest,
        timeout: Duration,
    ) -> Result<CrawlResponse, TavilyError> {
        self.client.post("/crawl", req, timeout).await
    }
}

impl<C: Config> crate::Client<C> {
    /// Returns the Crawl API resource
    #[must_use]
    pub const fn crawl(&self) -> Crawl<'_, C> {
        Crawl::new(self)
    }
}
