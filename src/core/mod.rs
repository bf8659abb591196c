//! Core business logic abstractions

pub mod config;
pub mod convert;
pub mod credentials;
pub mod error;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use convert::{ConversionResult, convert, validate_currency};
pub use credentials::CredentialProvider;
pub use error::{RateError, RateResult};
pub use rates::{Clock, RateSnapshot, RateSource, SystemClock};
