use crate::core::error::{RateError, RateResult};
use crate::core::rates::{RateSnapshot, RateSource};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

/// Response carrying a `result` field, either success or error.
#[derive(Debug, Deserialize)]
struct EnvelopeResponse {
    result: String,
    #[serde(rename = "error-type")]
    error_type: Option<String>,
    base_code: Option<String>,
    #[serde(flatten)]
    table: RateTable,
}

impl EnvelopeResponse {
    fn error_type(&self) -> String {
        self.error_type
            .clone()
            .unwrap_or_else(|| self.result.clone())
    }
}

#[derive(Debug, Deserialize)]
struct RateTable {
    time_next_update_utc: Option<String>,
    time_next_update_unix: Option<i64>,
    conversion_rates: Option<HashMap<String, f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UpstreamResponse {
    Envelope(EnvelopeResponse),
    Bare(RateTable),
}

/// Parses an upstream next-update timestamp such as
/// `Fri, 27 Mar 2020 00:00:00 +0000`.
pub fn parse_next_update(value: &str) -> RateResult<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RateError::TimestampParse(format!("{value:?}: {e}")))
}

fn resolve_next_update(table: &RateTable) -> RateResult<DateTime<Utc>> {
    let parsed = match table.time_next_update_utc.as_deref() {
        Some(value) => parse_next_update(value),
        None => Err(RateError::TimestampParse(
            "missing time_next_update_utc".to_string(),
        )),
    };

    parsed.or_else(|e| {
        table
            .time_next_update_unix
            .and_then(|ts| Utc.timestamp_opt(ts, 0).single())
            .ok_or(e)
    })
}

/// Turns a response body into a snapshot, accepting both the enveloped and
/// the bare schema. An unusable timestamp leaves `next_update_at` empty.
pub fn parse_response(body: &str, base_currency: &str) -> RateResult<RateSnapshot> {
    let response: UpstreamResponse = serde_json::from_str(body).map_err(|e| {
        error!(error = ?e, response = %body, "Failed to parse rate response");
        RateError::MalformedResponse(format!("failed to parse response for {base_currency}: {e}"))
    })?;

    let table = match response {
        UpstreamResponse::Envelope(envelope) => {
            if envelope.result != "success" {
                return Err(RateError::UpstreamApi(envelope.error_type()));
            }
            if let Some(code) = envelope.base_code.as_deref() {
                if !code.eq_ignore_ascii_case(base_currency) {
                    return Err(RateError::MalformedResponse(format!(
                        "requested rates for {base_currency} but received {code}"
                    )));
                }
            }
            envelope.table
        }
        UpstreamResponse::Bare(table) => table,
    };

    let rates = table.conversion_rates.as_ref().ok_or_else(|| {
        RateError::MalformedResponse(format!(
            "no conversion rates for {base_currency}; invalid API key or bad response"
        ))
    })?;
    if rates.is_empty() {
        return Err(RateError::MalformedResponse(format!(
            "empty rate table for {base_currency}"
        )));
    }

    let next_update_at = match resolve_next_update(&table) {
        Ok(ts) => Some(ts),
        Err(e) => {
            warn!(error = %e, "Snapshot for {} will not be cached", base_currency);
            None
        }
    };

    RateSnapshot::new(base_currency, table.conversion_rates.unwrap_or_default(), next_update_at)
}

/// Extracts the upstream error type from a non-success body, if it is an
/// error envelope.
fn error_type_from_body(body: &str) -> Option<String> {
    match serde_json::from_str::<UpstreamResponse>(body).ok()? {
        UpstreamResponse::Envelope(envelope) if envelope.result != "success" => {
            Some(envelope.error_type())
        }
        _ => None,
    }
}

fn transport_error(base_currency: &str, e: reqwest::Error) -> RateError {
    if e.is_timeout() {
        RateError::Transport(format!("request for {base_currency} timed out"))
    } else {
        RateError::Transport(format!(
            "request error for {base_currency}: {}",
            e.without_url()
        ))
    }
}

/// Client for the ExchangeRate-API v6 `latest` endpoint.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str, timeout: Duration) -> RateResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fxconv/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl RateSource for ExchangeRateApiProvider {
    #[instrument(skip(self, api_key))]
    async fn fetch_latest(&self, api_key: &str, base_currency: &str) -> RateResult<RateSnapshot> {
        if api_key.is_empty() {
            return Err(RateError::InvalidCredential("API key is empty".to_string()));
        }

        let url = format!("{}/v6/{}/latest/{}", self.base_url, api_key, base_currency);
        debug!("Requesting rates from {}/v6/***/latest/{}", self.base_url, base_currency);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(base_currency, e))?;

        let status = response.status();
        if !status.is_success() {
            // Error envelopes may come with a non-success status; keep their error type.
            let error_type = response
                .text()
                .await
                .ok()
                .and_then(|body| error_type_from_body(&body));

            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                let detail = error_type.map(|t| format!(" ({t})")).unwrap_or_default();
                return Err(RateError::InvalidCredential(format!(
                    "API key rejected with HTTP {status}{detail}"
                )));
            }
            if let Some(error_type) = error_type {
                return Err(RateError::UpstreamApi(error_type));
            }
            return Err(RateError::Transport(format!(
                "HTTP error: {status} for base currency: {base_currency}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|e| transport_error(base_currency, e))?;

        parse_response(&text, base_currency)
    }
}
