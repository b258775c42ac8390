//! In-memory fiat rate store
//!
//! Holds the latest complete rate snapshot. Writers replace the whole
//! snapshot under one lock, so readers never observe a torn value even
//! while a refresh is in flight.

use crate::{
    constants::RATE_STALE_THRESHOLD_SECS,
    error::RateError,
    types::{RateQuote, RateSnapshot},
};
use tokio::sync::RwLock;

/// In-memory store for the current fiat rate
pub struct RateStore {
    /// Latest snapshot, if any rate has been fetched yet
    rate: RwLock<Option<RateSnapshot>>,
}

impl RateStore {
    /// Creates a new empty rate store
    pub fn new() -> Self {
        Self {
            rate: RwLock::new(None),
        }
    }

    /// Replaces the stored snapshot
    ///
    /// # Returns
    /// The previous rate, if one was stored
    pub async fn update_rate(&self, snapshot: RateSnapshot) -> Option<f64> {
        let mut slot = self.rate.write().await;
        let previous = slot.as_ref().map(|s| s.rate_usd);
        tracing::debug!(
            rate_usd = snapshot.rate_usd,
            source = %snapshot.source,
            "Updated fiat rate"
        );
        *slot = Some(snapshot);
        previous
    }

    /// Gets the current snapshot, enforcing freshness
    ///
    /// # Returns
    /// The snapshot, or an error if none exists or it is stale
    pub async fn get_rate(&self) -> Result<RateSnapshot, RateError> {
        let slot = self.rate.read().await;
        let snapshot = slot.as_ref().ok_or(RateError::NotAvailable)?.clone();

        if snapshot.is_stale(RATE_STALE_THRESHOLD_SECS) {
            return Err(RateError::stale(snapshot.age()));
        }

        Ok(snapshot)
    }

    /// Gets a quote for display, tolerating staleness
    ///
    /// Rendering prefers a slightly old figure over the fiat fallback, so
    /// this returns the last snapshot regardless of age and `None` only
    /// when no rate was ever fetched.
    pub async fn display_quote(&self) -> Option<RateQuote> {
        let slot = self.rate.read().await;
        slot.as_ref().map(|snapshot| snapshot.quote())
    }

    /// Checks if any rate snapshot exists (regardless of staleness)
    pub async fn has_rate(&self) -> bool {
        self.rate.read().await.is_some()
    }

    /// Checks if the stored rate is stale or missing
    pub async fn is_stale(&self) -> bool {
        let slot = self.rate.read().await;
        match slot.as_ref() {
            Some(snapshot) => snapshot.is_stale(RATE_STALE_THRESHOLD_SECS),
            None => true,
        }
    }
}

impl Default for RateStore {
    fn default() -> Self {
        Self::new()
    }
}
