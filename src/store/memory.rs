use crate::core::rates::RateSnapshot;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory rate cache keyed by base currency.
///
/// Lookups share a read lock; a store takes the write lock and swaps in the
/// whole snapshot, so readers never see a partial table. Entries are only
/// replaced, never purged: staleness is checked by the caller.
#[derive(Default)]
pub struct RateCache {
    inner: RwLock<HashMap<String, Arc<RateSnapshot>>>,
}

impl RateCache {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub async fn lookup(&self, base_currency: &str) -> Option<Arc<RateSnapshot>> {
        let cache = self.inner.read().await;
        let snapshot = cache.get(base_currency).cloned();
        if snapshot.is_some() {
            debug!("Cache HIT for base currency: {}", base_currency);
        } else {
            debug!("Cache MISS for base currency: {}", base_currency);
        }
        snapshot
    }

    pub async fn store(&self, base_currency: &str, snapshot: Arc<RateSnapshot>) {
        let mut cache = self.inner.write().await;
        debug!("Cache PUT for base currency: {}", base_currency);
        cache.insert(base_currency.to_string(), snapshot);
    }

    #[cfg(test)]
    pub(crate) async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
