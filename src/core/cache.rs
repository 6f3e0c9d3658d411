use crate::core::clock::Clock;
use crate::core::currency::CurrencyCode;
use crate::core::rates::RateTable;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// How long a fetched rate table stays fresh.
pub const FRESHNESS_WINDOW: Duration = Duration::hours(1);

/// A persistent string key-value store.
///
/// Multi-key writes and removals must be applied atomically: either every
/// key changes or none do.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn put_all(&self, entries: Vec<(String, String)>) -> Result<()>;
    async fn remove_all(&self, keys: Vec<String>) -> Result<()>;
}

fn rates_key(base: CurrencyCode) -> String {
    format!("rates:{base}")
}

fn fetched_at_key(base: CurrencyCode) -> String {
    format!("rates_fetched_at:{base}")
}

/// Time-bounded cache of the latest rate table per base currency.
#[derive(Clone)]
pub struct RateCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl RateCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Returns the cached table for `base` while it is younger than
    /// [`FRESHNESS_WINDOW`].
    pub async fn get(&self, base: CurrencyCode) -> Option<RateTable> {
        let (rates, fetched_at) = match self.read_entry(base).await {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                debug!("Cache MISS for base: {}", base);
                return None;
            }
            Err(e) => {
                debug!("Cache entry for {} unreadable: {}", base, e);
                return None;
            }
        };

        let age = self.clock.now() - fetched_at;
        if age >= FRESHNESS_WINDOW {
            debug!("Cache entry expired for base: {} (age {}s)", base, age.num_seconds());
            return None;
        }

        debug!("Cache HIT for base: {}", base);
        Some(RateTable { base, rates })
    }

    /// Overwrites the entry for `base`. Rates and timestamp are written together.
    pub async fn put(&self, base: CurrencyCode, table: &RateTable, now: DateTime<Utc>) {
        let rates = match serde_json::to_string(&table.rates) {
            Ok(rates) => rates,
            Err(e) => {
                warn!("Failed to encode rates for {}: {}", base, e);
                return;
            }
        };
        let entries = vec![
            (rates_key(base), rates),
            (fetched_at_key(base), now.timestamp_millis().to_string()),
        ];
        match self.store.put_all(entries).await {
            Ok(()) => debug!("Cache PUT for base: {}", base),
            Err(e) => warn!("Failed to cache rates for {}: {}", base, e),
        }
    }

    pub async fn invalidate(&self, base: CurrencyCode) {
        match self
            .store
            .remove_all(vec![rates_key(base), fetched_at_key(base)])
            .await
        {
            Ok(()) => debug!("Cache INVALIDATE for base: {}", base),
            Err(e) => warn!("Failed to invalidate cached rates for {}: {}", base, e),
        }
    }

    async fn read_entry(
        &self,
        base: CurrencyCode,
    ) -> Result<Option<(BTreeMap<String, f64>, DateTime<Utc>)>> {
        let rates = self.store.get(&rates_key(base)).await?;
        let fetched_at = self.store.get(&fetched_at_key(base)).await?;
        let (Some(rates), Some(fetched_at)) = (rates, fetched_at) else {
            return Ok(None);
        };

        let rates: BTreeMap<String, f64> = serde_json::from_str(&rates)?;
        let millis: i64 = fetched_at.parse()?;
        let fetched_at = Utc
            .timestamp_millis_opt(millis)
            .single()
            .ok_or_else(|| anyhow::anyhow!("Invalid cache timestamp: {}", millis))?;
        Ok(Some((rates, fetched_at)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::store::memory::MemoryStore;

    fn usd_table() -> RateTable {
        RateTable::new(
            CurrencyCode::Usd,
            [("EUR".to_string(), 0.9), ("GBP".to_string(), 0.8)],
        )
    }

    fn setup() -> (RateCache, Arc<ManualClock>, Arc<MemoryStore>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let store = Arc::new(MemoryStore::new());
        let cache = RateCache::new(store.clone(), clock.clone());
        (cache, clock, store)
    }

    #[tokio::test]
    async fn test_read_after_write() {
        let (cache, _, _) = setup();
        assert!(cache.get(CurrencyCode::Usd).await.is_none());

        for base in CurrencyCode::ALL {
            let table = RateTable::new(base, [("EUR".to_string(), 1.5)]);
            cache.put(base, &table, cache.now()).await;
            assert_eq!(cache.get(base).await, Some(table));
        }
    }

    #[tokio::test]
    async fn test_entry_fresh_within_window() {
        let (cache, clock, _) = setup();
        cache.put(CurrencyCode::Usd, &usd_table(), cache.now()).await;

        clock.advance(Duration::minutes(59));
        assert_eq!(cache.get(CurrencyCode::Usd).await, Some(usd_table()));
    }

    #[tokio::test]
    async fn test_entry_expires_after_window() {
        let (cache, clock, _) = setup();
        cache.put(CurrencyCode::Usd, &usd_table(), cache.now()).await;

        clock.advance(Duration::minutes(61));
        assert!(cache.get(CurrencyCode::Usd).await.is_none());

        // Expiry is a read-side decision; the entry is still stored
        clock.advance(Duration::minutes(-61));
        assert!(cache.get(CurrencyCode::Usd).await.is_some());
    }

    #[tokio::test]
    async fn test_window_boundary_is_a_miss() {
        let (cache, clock, _) = setup();
        cache.put(CurrencyCode::Usd, &usd_table(), cache.now()).await;

        clock.advance(FRESHNESS_WINDOW);
        assert!(cache.get(CurrencyCode::Usd).await.is_none());
    }

    #[tokio::test]
    async fn test_entries_scoped_per_base() {
        let (cache, _, _) = setup();
        cache.put(CurrencyCode::Usd, &usd_table(), cache.now()).await;

        assert!(cache.get(CurrencyCode::Eur).await.is_none());
        assert!(cache.get(CurrencyCode::Usd).await.is_some());
    }

    #[tokio::test]
    async fn test_put_overwrites_rates_and_timestamp() {
        let (cache, clock, _) = setup();
        cache.put(CurrencyCode::Usd, &usd_table(), cache.now()).await;

        clock.advance(Duration::minutes(50));
        let newer = RateTable::new(CurrencyCode::Usd, [("EUR".to_string(), 0.95)]);
        cache.put(CurrencyCode::Usd, &newer, cache.now()).await;

        clock.advance(Duration::minutes(30));
        assert_eq!(cache.get(CurrencyCode::Usd).await, Some(newer));
    }

    #[tokio::test]
    async fn test_invalidate_forces_miss() {
        let (cache, _, _) = setup();
        cache.put(CurrencyCode::Usd, &usd_table(), cache.now()).await;

        cache.invalidate(CurrencyCode::Usd).await;
        assert!(cache.get(CurrencyCode::Usd).await.is_none());
    }

    #[tokio::test]
    async fn test_half_written_entry_is_a_miss() {
        let (cache, _, store) = setup();
        store
            .put_all(vec![("rates:USD".to_string(), r#"{"EUR":0.9}"#.to_string())])
            .await
            .unwrap();
        assert!(cache.get(CurrencyCode::Usd).await.is_none());

        store
            .put_all(vec![(
                "rates_fetched_at:USD".to_string(),
                "not-a-number".to_string(),
            )])
            .await
            .unwrap();
        assert!(cache.get(CurrencyCode::Usd).await.is_none());
    }
}
