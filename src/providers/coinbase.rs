//! Coinbase rate provider implementation

use crate::{
    constants::{COINBASE_SPOT_URL, REQUEST_TIMEOUT_SECS, USER_AGENT},
    error::RateFeedError,
    provider::RateProvider,
    types::RateQuote,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Coinbase spot price response
/// Returns the amount as a decimal string
#[derive(Debug, Deserialize)]
struct CoinbaseResponse {
    data: CoinbaseSpot,
}

#[derive(Debug, Deserialize)]
struct CoinbaseSpot {
    amount: String,
}

/// Coinbase rate provider
///
/// Returns the bare-number quote shape; the spot endpoint carries a single
/// amount with no wrapping record.
pub struct CoinbaseProvider {
    client: Client,
}

impl CoinbaseProvider {
    /// Creates a new Coinbase provider
    pub fn new() -> Result<Self, RateFeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(RateFeedError::NetworkError)?;

        Ok(Self { client })
    }
}

impl Default for CoinbaseProvider {
    fn default() -> Self {
        Self::new().expect("Failed to create Coinbase provider")
    }
}

#[async_trait]
impl RateProvider for CoinbaseProvider {
    async fn fetch_rate(&self) -> Result<RateQuote, RateFeedError> {
        tracing::debug!(url = COINBASE_SPOT_URL, "Fetching rate from Coinbase");

        let response = self
            .client
            .get(COINBASE_SPOT_URL)
            .send()
            .await
            .map_err(RateFeedError::NetworkError)?;

        // Check for rate limiting
        if response.status().as_u16() == 429 {
            return Err(RateFeedError::RateLimitExceeded);
        }

        // Check for other errors
        if !response.status().is_success() {
            return Err(RateFeedError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let response_text = response.text().await.map_err(RateFeedError::NetworkError)?;

        let parsed: CoinbaseResponse = serde_json::from_str(&response_text).map_err(|e| {
            RateFeedError::InvalidResponse(format!(
                "Failed to parse Coinbase response: {}. Response: {}",
                e, response_text
            ))
        })?;

        let rate_usd: f64 = parsed.data.amount.parse().map_err(|_| {
            RateFeedError::InvalidResponse(format!(
                "Non-numeric Coinbase amount: {}",
                parsed.data.amount
            ))
        })?;

        tracing::debug!(rate_usd, "Successfully fetched rate from Coinbase");

        Ok(RateQuote::Bare(rate_usd))
    }

    fn provider_name(&self) -> &'static str {
        "coinbase"
    }
}
