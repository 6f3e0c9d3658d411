//! Seven day rate history

use crate::core::currency::CurrencyCode;
use crate::core::rates::{HistoricalPoint, HistoryError, RateProvider};
use chrono::{Days, NaiveDate};
use futures::future::try_join_all;
use tracing::debug;

pub const HISTORY_DAYS: u64 = 7;

/// The [`HISTORY_DAYS`] calendar days ending on `today`, oldest first.
pub fn history_dates(today: NaiveDate) -> Vec<NaiveDate> {
    (0..HISTORY_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .collect()
}

/// Fetches the `target` rate for each history day concurrently and returns
/// the points in chronological order.
pub async fn fetch_history(
    provider: &dyn RateProvider,
    base: CurrencyCode,
    target: CurrencyCode,
    today: NaiveDate,
) -> Result<Vec<HistoricalPoint>, HistoryError> {
    let requests = history_dates(today).into_iter().map(|date| async move {
        let table = provider
            .historical_rates(base, date)
            .await
            .map_err(|source| HistoryError::Fetch { date, source })?;
        let rate = table
            .rate(target.as_str())
            .ok_or(HistoryError::RateUnavailable { date, target })?;
        debug!("Historical {}/{} on {}: {}", base, target, date, rate);
        Ok::<_, HistoryError>(HistoricalPoint { date, rate })
    });

    try_join_all(requests).await
}

/// Percentage change of each point against the previous one.
pub fn daily_changes(points: &[HistoricalPoint]) -> Vec<Option<f64>> {
    let mut changes = Vec::with_capacity(points.len());
    let mut previous: Option<f64> = None;
    for point in points {
        changes.push(previous.map(|p| ((point.rate - p) / p) * 100.0));
        previous = Some(point.rate);
    }
    changes
}
