//! Failover rate provider implementation

use crate::{error::RateFeedError, provider::RateProvider, types::RateQuote};
use async_trait::async_trait;
use std::sync::Arc;

/// Rate provider that attempts to fetch from multiple providers in order
/// until one succeeds.
pub struct FailoverProvider {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl FailoverProvider {
    /// Creates a new failover provider with a list of providers
    ///
    /// The providers are tried in the order they are provided.
    pub fn new(providers: Vec<Arc<dyn RateProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl RateProvider for FailoverProvider {
    async fn fetch_rate(&self) -> Result<RateQuote, RateFeedError> {
        let mut last_error = None;

        for provider in &self.providers {
            match provider.fetch_rate().await {
                Ok(quote) => return Ok(quote),
                Err(e) => {
                    tracing::warn!(
                        provider = provider.provider_name(),
                        error = %e,
                        "Rate provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RateFeedError::InvalidResponse("No providers configured for failover".to_string())
        }))
    }

    fn provider_name(&self) -> &'static str {
        "failover"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockRateProvider;

    #[tokio::test]
    async fn falls_through_to_the_next_provider() {
        let primary = Arc::new(MockRateProvider::new());
        primary.set_error("down for maintenance");
        let backup = Arc::new(MockRateProvider::new());
        backup.set_rate(1500.0);

        let failover = FailoverProvider::new(vec![primary.clone(), backup.clone()]);

        let quote = failover.fetch_rate().await.unwrap();
        assert_eq!(quote.value(), 1500.0);
        assert_eq!(primary.call_count(), 1);
        assert_eq!(backup.call_count(), 1);
    }

    #[tokio::test]
    async fn reports_the_last_error_when_all_fail() {
        let primary = Arc::new(MockRateProvider::new());
        primary.set_error("first down");
        let backup = Arc::new(MockRateProvider::new());
        backup.set_error("second down");

        let failover = FailoverProvider::new(vec![primary, backup]);

        let err = failover.fetch_rate().await.unwrap_err();
        assert!(err.to_string().contains("second down"));
    }
}
