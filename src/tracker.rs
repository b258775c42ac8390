//! Fiat rate tracker service
//!
//! Provides a singleton instance for tracking the native asset's USD rate.

use crate::{
    constants::{
        INITIAL_BACKOFF_MS, MAX_BACKOFF_MS, MAX_RETRY_ATTEMPTS, RATE_REFRESH_INTERVAL_SECS,
    },
    error::{RateError, RateFeedError},
    metrics::{FeedMetrics, MetricsCollector},
    provider::RateProvider,
    providers::{CoinGeckoProvider, CoinbaseProvider, FailoverProvider},
    store::RateStore,
    types::{RateQuote, RateSnapshot, SessionEvent},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, OnceCell};
use tokio::time::sleep;
use uuid::Uuid;

static GLOBAL_TRACKER: OnceCell<Arc<RateTracker>> = OnceCell::const_new();

/// Capacity of the rate event channel
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Fiat Rate Tracker
///
/// Manages fetching and storing the native-asset USD rate from external
/// feeds. Uses a singleton pattern for easy access throughout the
/// application; the catalog reads whatever snapshot is current and never
/// blocks on a refresh.
///
/// # Example
/// ```no_run
/// use course_market_sdk::RateTracker;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tracker = RateTracker::global().await;
/// let snapshot = tracker.get_rate().await?;
/// println!("ETH/USD: ${:.2}", snapshot.rate_usd);
/// # Ok(())
/// # }
/// ```
pub struct RateTracker {
    store: Arc<RateStore>,
    provider: Arc<dyn RateProvider>,
    metrics: Arc<MetricsCollector>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for RateTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RateTracker {
    /// Returns the global singleton instance
    ///
    /// On first call, this initializes the tracker and starts the background
    /// polling task. Subsequent calls return the same instance.
    pub async fn global() -> Arc<Self> {
        GLOBAL_TRACKER
            .get_or_init(|| async {
                let tracker = Self::new();
                tracker.start_background_task();
                Arc::new(tracker)
            })
            .await
            .clone()
    }

    /// Creates a new rate tracker
    ///
    /// This is primarily for testing. Use `global()` in production code.
    /// By default, it uses the provider specified in the `RATE_FEED_PROVIDER`
    /// environment variable ("coingecko" or "coinbase"). Defaults to failover.
    pub fn new() -> Self {
        let provider_name =
            std::env::var("RATE_FEED_PROVIDER").unwrap_or_else(|_| "failover".to_string());

        let provider: Arc<dyn RateProvider> = match provider_name.to_lowercase().as_str() {
            "coingecko" => Arc::new(CoinGeckoProvider::default()),
            "coinbase" => Arc::new(CoinbaseProvider::default()),
            _ => {
                // Default failover: CoinGecko (primary) -> Coinbase (backup)
                Arc::new(FailoverProvider::new(vec![
                    Arc::new(CoinGeckoProvider::default()),
                    Arc::new(CoinbaseProvider::default()),
                ]))
            }
        };

        Self::with_provider(provider)
    }

    /// Creates a new rate tracker with a custom provider
    ///
    /// This is primarily for testing with mock providers.
    pub fn with_provider(provider: Arc<dyn RateProvider>) -> Self {
        let store = Arc::new(RateStore::new());
        let metrics = Arc::new(MetricsCollector::new(provider.provider_name()));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            store,
            provider,
            metrics,
            events,
        }
    }

    /// Starts the background polling task
    fn start_background_task(&self) {
        let store = self.store.clone();
        let provider = self.provider.clone();
        let metrics = self.metrics.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            tracing::info!(
                refresh_interval_secs = RATE_REFRESH_INTERVAL_SECS,
                "Starting fiat rate tracker background task"
            );

            loop {
                if let Err(e) = Self::fetch_and_update(&provider, &store, &metrics, &events).await
                {
                    tracing::warn!(error = %e, "Failed to refresh fiat rate");
                }

                sleep(Duration::from_secs(RATE_REFRESH_INTERVAL_SECS)).await;
            }
        });
    }

    /// Fetches the rate from the provider and updates the store with
    /// metrics tracking
    async fn fetch_and_update(
        provider: &Arc<dyn RateProvider>,
        store: &Arc<RateStore>,
        metrics: &Arc<MetricsCollector>,
        events: &broadcast::Sender<SessionEvent>,
    ) -> Result<(), RateFeedError> {
        let mut backoff_ms = INITIAL_BACKOFF_MS;
        let start = Instant::now();

        for attempt in 1..=MAX_RETRY_ATTEMPTS {
            match Self::fetch_valid_rate(provider).await {
                Ok(rate_usd) => {
                    tracing::debug!(
                        rate_usd,
                        provider = provider.provider_name(),
                        latency_ms = start.elapsed().as_millis() as u64,
                        "Successfully fetched fiat rate"
                    );
                    let previous = store
                        .update_rate(RateSnapshot::new(
                            rate_usd,
                            provider.provider_name().to_string(),
                        ))
                        .await;
                    metrics.record_request(start.elapsed(), true).await;
                    let _ = events.send(SessionEvent::RateUpdated {
                        id: Uuid::new_v4(),
                        old_rate_usd: previous,
                        new_rate_usd: rate_usd,
                        timestamp: Utc::now(),
                    });
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt,
                        max_attempts = MAX_RETRY_ATTEMPTS,
                        error = %e,
                        "Failed to fetch fiat rate, retrying"
                    );

                    if attempt < MAX_RETRY_ATTEMPTS {
                        sleep(Duration::from_millis(backoff_ms)).await;
                        backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
                    } else {
                        metrics.record_request(start.elapsed(), false).await;
                        return Err(e);
                    }
                }
            }
        }

        Err(RateFeedError::InvalidResponse(
            "Max retries exceeded".to_string(),
        ))
    }

    /// Fetches a quote and rejects values that cannot price anything
    async fn fetch_valid_rate(
        provider: &Arc<dyn RateProvider>,
    ) -> Result<f64, RateFeedError> {
        let quote = provider.fetch_rate().await?;
        let rate_usd = quote.value();
        if !rate_usd.is_finite() || rate_usd <= 0.0 {
            return Err(RateFeedError::InvalidResponse(format!(
                "Unusable rate value: {}",
                rate_usd
            )));
        }
        Ok(rate_usd)
    }

    /// Gets the current rate snapshot
    ///
    /// # Returns
    /// The current snapshot or an error if not available or stale
    pub async fn get_rate(&self) -> Result<RateSnapshot, RateError> {
        self.store.get_rate().await
    }

    /// Gets a quote for display, tolerating staleness
    ///
    /// Suitable for the fiat oracle: `None` only when no rate has ever
    /// been fetched.
    pub async fn display_quote(&self) -> Option<RateQuote> {
        self.store.display_quote().await
    }

    /// Checks if any rate snapshot exists (regardless of staleness)
    pub async fn has_rate(&self) -> bool {
        self.store.has_rate().await
    }

    /// Checks if the stored rate is stale or missing
    pub async fn is_stale(&self) -> bool {
        self.store.is_stale().await
    }

    /// Returns the name of the current provider
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Returns a handle to the underlying store
    ///
    /// The catalog session reads display quotes through this handle.
    pub fn store(&self) -> Arc<RateStore> {
        self.store.clone()
    }

    /// Forces an immediate rate refresh
    ///
    /// This bypasses the normal polling interval and fetches a fresh rate
    /// immediately.
    ///
    /// # Returns
    /// Ok if the rate was successfully fetched and stored
    pub async fn refresh_now(&self) -> Result<(), RateFeedError> {
        Self::fetch_and_update(&self.provider, &self.store, &self.metrics, &self.events).await
    }

    /// Gets feed metrics including latency percentiles and success rates
    pub async fn get_feed_metrics(&self) -> FeedMetrics {
        self.metrics.get_metrics().await
    }

    /// Subscribes to rate-update events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::MockRateProvider;

    #[tokio::test]
    async fn refresh_now_stores_the_fetched_rate() {
        let provider = Arc::new(MockRateProvider::new());
        provider.set_rate(1500.0);
        let tracker = RateTracker::with_provider(provider);
        let mut events = tracker.subscribe();

        tracker.refresh_now().await.unwrap();

        let snapshot = tracker.get_rate().await.unwrap();
        assert_eq!(snapshot.rate_usd, 1500.0);
        assert_eq!(snapshot.source, "mock");

        match events.recv().await.unwrap() {
            SessionEvent::RateUpdated {
                old_rate_usd,
                new_rate_usd,
                ..
            } => {
                assert_eq!(old_rate_usd, None);
                assert_eq!(new_rate_usd, 1500.0);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn keyed_quotes_are_stored_like_bare_ones() {
        let provider = Arc::new(MockRateProvider::new());
        provider.set_keyed_rate(2000.0);
        let tracker = RateTracker::with_provider(provider);

        tracker.refresh_now().await.unwrap();

        assert_eq!(tracker.get_rate().await.unwrap().rate_usd, 2000.0);
    }

    #[tokio::test]
    async fn non_positive_rates_are_rejected() {
        let provider = Arc::new(MockRateProvider::new());
        provider.set_rate(0.0);
        let tracker = RateTracker::with_provider(provider.clone());

        let err = tracker.refresh_now().await.unwrap_err();
        assert!(err.to_string().contains("Unusable rate"));
        assert!(!tracker.has_rate().await);
        // One attempt per retry
        assert_eq!(provider.call_count(), MAX_RETRY_ATTEMPTS as usize);
    }

    #[tokio::test]
    async fn failed_refresh_is_recorded_in_metrics() {
        let provider = Arc::new(MockRateProvider::new());
        provider.set_error("feed down");
        let tracker = RateTracker::with_provider(provider);

        assert!(tracker.refresh_now().await.is_err());

        let metrics = tracker.get_feed_metrics().await;
        assert_eq!(metrics.total_requests, 1);
        assert_eq!(metrics.failed_requests, 1);
    }
}
