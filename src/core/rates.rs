//! Exchange rate abstractions and core types

use crate::core::currency::CurrencyCode;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// Conversion factors relative to a single base currency.
///
/// Keys are the codes exactly as the provider returned them, so the table may
/// hold currencies outside [`CurrencyCode::ALL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub base: CurrencyCode,
    pub rates: BTreeMap<String, f64>,
}

impl RateTable {
    /// Builds a table, dropping factors that are not finite and positive.
    pub fn new(base: CurrencyCode, rates: impl IntoIterator<Item = (String, f64)>) -> Self {
        let rates = rates
            .into_iter()
            .filter(|(code, rate)| {
                let valid = rate.is_finite() && *rate > 0.0;
                if !valid {
                    tracing::debug!("Dropping invalid rate {} for {}", rate, code);
                }
                valid
            })
            .map(|(code, rate)| (code.to_uppercase(), rate))
            .collect();
        Self { base, rates }
    }

    pub fn rate(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.to_uppercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchReason {
    Transport,
    Http,
    Parse,
}

impl Display for FetchReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                FetchReason::Transport => "transport",
                FetchReason::Http => "http",
                FetchReason::Parse => "parse",
            }
        )
    }
}

/// Failure of a single request to the rate provider.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RateFetchError {
    #[error("Failed to reach rate provider at {url}: {message}")]
    Transport { url: String, message: String },

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Failed to parse rate response from {url}: {message}")]
    Parse { url: String, message: String },
}

impl RateFetchError {
    pub fn reason(&self) -> FetchReason {
        match self {
            RateFetchError::Transport { .. } => FetchReason::Transport,
            RateFetchError::Http { .. } => FetchReason::Http,
            RateFetchError::Parse { .. } => FetchReason::Parse,
        }
    }
}

/// Failure while assembling the historical series.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HistoryError {
    #[error("Historical rates for {date} unavailable: {source}")]
    Fetch {
        date: NaiveDate,
        source: RateFetchError,
    },

    #[error("No {target} rate in historical data for {date}")]
    RateUnavailable { date: NaiveDate, target: CurrencyCode },
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn latest_rates(&self, base: CurrencyCode) -> Result<RateTable, RateFetchError>;

    async fn historical_rates(
        &self,
        base: CurrencyCode,
        date: NaiveDate,
    ) -> Result<RateTable, RateFetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table_drops_invalid_factors() {
        let table = RateTable::new(
            CurrencyCode::Usd,
            [
                ("EUR".to_string(), 0.9),
                ("GBP".to_string(), 0.0),
                ("JPY".to_string(), -1.0),
                ("CHF".to_string(), f64::NAN),
                ("inr".to_string(), 83.1),
            ],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rate("EUR"), Some(0.9));
        assert_eq!(table.rate("INR"), Some(83.1));
        assert_eq!(table.rate("GBP"), None);
        assert_eq!(table.rate("XYZ"), None);
    }

    #[test]
    fn test_fetch_error_reason_and_message() {
        let err = RateFetchError::Http {
            status: 500,
            message: "HTTP error! status: 500".to_string(),
        };
        assert_eq!(err.reason(), FetchReason::Http);
        assert_eq!(err.to_string(), "HTTP error! status: 500");

        let err = RateFetchError::Parse {
            url: "http://localhost/latest/USD".to_string(),
            message: "missing field `rates`".to_string(),
        };
        assert_eq!(err.reason().to_string(), "parse");
        assert!(err.to_string().contains("missing field `rates`"));
    }
}
