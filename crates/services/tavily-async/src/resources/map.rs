use std::time::Duration;

use crate::{
    client::Client,
    config::Config,
    error::TavilyError,
    types::crawl::{MapRequest, MapResponse},
};

/// API resource for the `/map` endpoint
pub struct Map<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Map<'c, C> {
    /// Creates a new Map resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Map the URL structure of a site
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, exceeds `timeout`, or the API returns an error.
    pub async fn create(
        &self,
        req: &MapRequest,
        timeout: Duration,
    ) -> Result<MapResponse, TavilyError> {
        self.client.post("/map", req, timeout).await
    }
}

impl<C: Config> crate::Client<C> {
    /// Returns the Map API resource
    #[must_use]
    pub const fn map(&self) -> Map<'_, C> {
        Map::new(self)
    }
}
