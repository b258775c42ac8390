//! CoinGecko rate provider implementation

use crate::{
    constants::{
        COINGECKO_API_URL, COINGECKO_NATIVE_ASSET_ID, COINGECKO_SIMPLE_PRICE_ENDPOINT,
        REQUEST_TIMEOUT_SECS, USER_AGENT,
    },
    error::RateFeedError,
    provider::RateProvider,
    types::RateQuote,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// CoinGecko API response for simple price queries
#[derive(Debug, Deserialize)]
struct CoinGeckoResponse {
    #[serde(flatten)]
    rates: HashMap<String, CoinGeckoRate>,
}

#[derive(Debug, Deserialize)]
struct CoinGeckoRate {
    usd: f64,
}

/// CoinGecko rate provider
///
/// Returns the record-with-price quote shape; the rate is nested under
/// the asset id on the wire.
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    /// Creates a new CoinGecko provider
    pub fn new() -> Result<Self, RateFeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(RateFeedError::NetworkError)?;

        Ok(Self { client })
    }

    /// Builds the CoinGecko API URL for the native asset rate
    fn build_url(&self) -> String {
        format!(
            "{}{}?ids={}&vs_currencies=usd",
            COINGECKO_API_URL, COINGECKO_SIMPLE_PRICE_ENDPOINT, COINGECKO_NATIVE_ASSET_ID
        )
    }
}

impl Default for CoinGeckoProvider {
    fn default() -> Self {
        Self::new().expect("Failed to create CoinGecko provider")
    }
}

#[async_trait]
impl RateProvider for CoinGeckoProvider {
    async fn fetch_rate(&self) -> Result<RateQuote, RateFeedError> {
        let url = self.build_url();
        tracing::debug!(url = %url, "Fetching rate from CoinGecko");

        let response = self
            .client
            .get(&url)
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

        let parsed: CoinGeckoResponse = serde_json::from_str(&response_text).map_err(|e| {
            RateFeedError::InvalidResponse(format!(
                "Failed to parse CoinGecko response: {}. Response: {}",
                e, response_text
            ))
        })?;

        let rate = parsed
            .rates
            .get(COINGECKO_NATIVE_ASSET_ID)
            .ok_or_else(|| {
                RateFeedError::InvalidResponse("No rate returned from CoinGecko".to_string())
            })?;

        tracing::debug!(rate_usd = rate.usd, "Successfully fetched rate from CoinGecko");

        Ok(RateQuote::Keyed { price: rate.usd })
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
