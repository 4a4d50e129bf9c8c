use std::time::Duration;

use crate::{
    client::Client,
    config::Config,
    error::TavilyError,
    types::extract::{ExtractRequest, ExtractResponse},
};

/// API resource for the `/extract` endpoint
pub struct Extract<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Extract<'c, C> {
    /// Creates a new Extract resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Extract content from one or more URLs
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, exceeds `timeout`, or the API returns an error.
    pub async fn create(
        &self,
        req: &ExtractRequest,
        timeout: Duration,
    ) -> Result<ExtractResponse, TavilyError> {
        self.client.post("/extract", req, timeout).await
    }
}

impl<C: Config> crate::Client<C> {
    /// Returns the Extract API resource
    #[must_use]
    pub const fn extract(&self) -> Extract<'_, C> {
        Extract::new(self)
    }
}
