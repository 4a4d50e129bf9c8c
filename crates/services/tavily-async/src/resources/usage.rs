use std::time::Duration;

use crate::{client::Client, config::Config, error::TavilyError, types::usage::UsageResponse};

/// API resource for the `/usage` endpoint
///
/// Costs no credits, which makes it the cheapest authenticated round trip.
pub struct Usage<'c, C: Config> {
    client: &'c Client<C>,
}

impl<'c, C: Config> Usage<'c, C> {
    /// Creates a new Usage resource
    #[must_use]
    pub const fn new(client: &'c Client<C>) -> Self {
        Self { client }
    }

    /// Fetch usage counters for the configured key
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, exceeds `timeout`, or the API returns an error.
    pub async fn get(&self, timeout: Duration) -> Result<UsageResponse, TavilyError> {
        self.client.get("/usage", timeout).await
    }
}

impl<C: Config> crate::Client<C> {
    /// Returns the Usage API resource
    #[must_use]
    pub const fn usage(&self) -> Usage<'_, C> {
        Usage::new(self)
    }
}
