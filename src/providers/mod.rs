pub mod caching;
pub mod exchangerate_api;

pub use caching::CachingRateFetcher;
pub use exchangerate_api::ExchangeRateApiProvider;
