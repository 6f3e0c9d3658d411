use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::currency::CurrencyCode;
use crate::core::rates::{RateFetchError, RateProvider, RateTable};

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
}

/// Client for exchangerate-api style endpoints:
/// `{base_url}/latest/{BASE}` and `{base_url}/historical/{date}/{BASE}`.
pub struct ExchangeRateApiProvider {
    base_url: String,
    client: reqwest::Client,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("xconv/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn fetch_table(&self, url: &str, base: CurrencyCode) -> Result<RateTable, RateFetchError> {
        debug!("Requesting rates from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| RateFetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| RateFetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        if !status.is_success() {
            return Err(http_error(status, &text));
        }

        let data: RatesResponse =
            serde_json::from_str(&text).map_err(|e| RateFetchError::Parse {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let table = RateTable::new(base, data.rates);
        debug!("Received {} rates for base {}", table.len(), base);
        Ok(table)
    }
}

fn http_error(status: StatusCode, body: &str) -> RateFetchError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|e| e.error)
        .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    RateFetchError::Http {
        status: status.as_u16(),
        message,
    }
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "LatestRatesFetch", skip(self), fields(base = %base))]
    async fn latest_rates(&self, base: CurrencyCode) -> Result<RateTable, RateFetchError> {
        let url = format!("{}/latest/{}", self.base_url, base);
        self.fetch_table(&url, base).await
    }

    #[instrument(
        name = "HistoricalRatesFetch",
        skip(self),
        fields(base = %base, date = %date)
    )]
    async fn historical_rates(
        &self,
        base: CurrencyCode,
        date: NaiveDate,
    ) -> Result<RateTable, RateFetchError> {
        let url = format!(
            "{}/historical/{}/{}",
            self.base_url,
            date.format("%Y-%m-%d"),
            base
        );
        self.fetch_table(&url, base).await
    }
}
