//! Exchange rate snapshots and the network seam that produces them.

use super::error::{RateError, RateResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// One upstream rate table for a single base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSnapshot {
    base_currency: String,
    rates: HashMap<String, f64>,
    next_update_at: Option<DateTime<Utc>>,
}

impl RateSnapshot {
    /// Builds a snapshot. An empty rate table is rejected as a malformed
    /// response, so every snapshot in circulation has at least one rate.
    pub fn new(
        base_currency: &str,
        rates: HashMap<String, f64>,
        next_update_at: Option<DateTime<Utc>>,
    ) -> RateResult<Self> {
        if rates.is_empty() {
            return Err(RateError::MalformedResponse(format!(
                "empty rate table for {base_currency}"
            )));
        }
        Ok(Self {
            base_currency: base_currency.to_uppercase(),
            rates,
            next_update_at,
        })
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn rates(&self) -> &HashMap<String, f64> {
        &self.rates
    }

    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    /// Instant after which the snapshot is stale. `None` when upstream gave no
    /// usable timestamp; such snapshots are never reused.
    pub fn next_update_at(&self) -> Option<DateTime<Utc>> {
        self.next_update_at
    }

    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.next_update_at.is_some_and(|expiry| now < expiry)
    }
}

/// Performs the upstream request for a base currency's rate table.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_latest(&self, api_key: &str, base_currency: &str) -> RateResult<RateSnapshot>;
}

/// Source of the current time, injectable so expiry can be tested.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn rates(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_empty_rates_rejected() {
        let result = RateSnapshot::new("USD", HashMap::new(), Some(Utc::now()));
        assert!(matches!(result, Err(RateError::MalformedResponse(_))));
    }

    #[test]
    fn test_base_currency_uppercased() {
        let snapshot = RateSnapshot::new("usd", rates(&[("EUR", 0.9)]), None).unwrap();
        assert_eq!(snapshot.base_currency(), "USD");
        assert_eq!(snapshot.rate("EUR"), Some(0.9));
        assert_eq!(snapshot.rate("GBP"), None);
    }

    #[test]
    fn test_freshness_window() {
        let now = Utc::now();
        let snapshot =
            RateSnapshot::new("USD", rates(&[("EUR", 0.9)]), Some(now + Duration::hours(1)))
                .unwrap();

        assert!(snapshot.is_fresh(now));
        assert!(!snapshot.is_fresh(now + Duration::hours(1)));
        assert!(!snapshot.is_fresh(now + Duration::hours(2)));
    }

    #[test]
    fn test_snapshot_without_expiry_is_never_fresh() {
        let snapshot = RateSnapshot::new("USD", rates(&[("EUR", 0.9)]), None).unwrap();
        assert!(!snapshot.is_fresh(Utc::now()));
    }
}
