use crate::core::error::RateResult;
use crate::core::rates::{Clock, RateSnapshot, RateSource, SystemClock};
use crate::store::RateCache;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Serves rate snapshots from the cache while they are fresh and refreshes
/// them from the wrapped source once `next_update_at` has passed.
pub struct CachingRateFetcher<S: RateSource> {
    inner: S,
    cache: Arc<RateCache>,
    clock: Arc<dyn Clock>,
}

impl<S: RateSource> CachingRateFetcher<S> {
    pub fn new(inner: S, cache: Arc<RateCache>) -> Self {
        Self::with_clock(inner, cache, Arc::new(SystemClock))
    }

    pub fn with_clock(inner: S, cache: Arc<RateCache>, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner,
            cache,
            clock,
        }
    }

    #[cfg(test)]
    pub(crate) fn cache(&self) -> &Arc<RateCache> {
        &self.cache
    }

    /// Returns the rate table for `base_currency`. The returned snapshot
    /// always has a non-empty rate table.
    #[instrument(skip(self, api_key))]
    pub async fn fetch(&self, api_key: &str, base_currency: &str) -> RateResult<Arc<RateSnapshot>> {
        if let Some(cached) = self.cache.lookup(base_currency).await {
            if cached.is_fresh(self.clock.now()) {
                debug!("Serving {} rates from cache", base_currency);
                return Ok(cached);
            }
            debug!("Cached rates for {} expired", base_currency);
        }

        info!("Fetching rates for {}", base_currency);
        let snapshot = Arc::new(self.inner.fetch_latest(api_key, base_currency).await?);

        if snapshot.next_update_at().is_some() {
            self.cache
                .store(base_currency, Arc::clone(&snapshot))
                .await;
            debug!("Cached rates for {}", base_currency);
        }
        Ok(snapshot)
    }
}
