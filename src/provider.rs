//! Provider abstraction for fetching the fiat rate from external feeds

use crate::{error::RateFeedError, types::RateQuote};
use async_trait::async_trait;

/// Trait for fiat rate providers
///
/// Implementations fetch the USD rate of the native payment asset from
/// various sources (CoinGecko, Coinbase, etc.). Each source keeps its own
/// wire shape; the returned [`RateQuote`] preserves it.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetches the current fiat rate
    ///
    /// # Returns
    /// The rate quote, or an error if the fetch fails
    async fn fetch_rate(&self) -> Result<RateQuote, RateFeedError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
