//! Conversion requests: credentials, cached rate lookup, validation and
//! arithmetic wired together.

use crate::core::convert::{ConversionResult, convert_with};
use crate::core::credentials::CredentialProvider;
use crate::core::error::RateResult;
use crate::core::rates::{RateSnapshot, RateSource};
use crate::providers::CachingRateFetcher;
use std::sync::Arc;
use tracing::debug;

pub struct Converter<S: RateSource> {
    fetcher: CachingRateFetcher<S>,
    credentials: Arc<dyn CredentialProvider>,
}

fn normalize(code: &str) -> String {
    code.trim().to_uppercase()
}

impl<S: RateSource> Converter<S> {
    pub fn new(fetcher: CachingRateFetcher<S>, credentials: Arc<dyn CredentialProvider>) -> Self {
        Self {
            fetcher,
            credentials,
        }
    }

    /// Fetches (or reuses) the full rate table for `base`.
    pub async fn rates(&self, base: &str) -> RateResult<Arc<RateSnapshot>> {
        let api_key = self.credentials.api_key().await?;
        self.fetcher.fetch(&api_key, &normalize(base)).await
    }

    pub async fn convert(&self, from: &str, to: &str, amount: f64) -> RateResult<ConversionResult> {
        let (from, to) = (normalize(from), normalize(to));
        let snapshot = self.rates(&from).await?;
        let result = convert_with(&snapshot, &to, amount)?;
        debug!(rate = result.rate, "Converted {} {} to {}", amount, from, to);
        Ok(result)
    }
}
