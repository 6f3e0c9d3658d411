//! Rate service: owns the observable state shared with the presentation layer.

use crate::core::cache::RateCache;
use crate::core::convert::{Conversion, convert, parse_amount};
use crate::core::currency::CurrencyCode;
use crate::core::history::fetch_history;
use crate::core::rates::{HistoricalPoint, HistoryError, RateFetchError, RateProvider, RateTable};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::watch;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub base: CurrencyCode,
    pub target: CurrencyCode,
}

impl Selection {
    pub fn swapped(self) -> Self {
        Selection {
            base: self.target,
            target: self.base,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RateState {
    Idle,
    Loading,
    Ready(RateTable),
    Error(RateFetchError),
}

impl RateState {
    pub fn table(&self) -> Option<&RateTable> {
        match self {
            RateState::Ready(table) => Some(table),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, RateState::Loading)
    }

    pub fn error(&self) -> Option<&RateFetchError> {
        match self {
            RateState::Error(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryState {
    Idle,
    Loading,
    Ready(Vec<HistoricalPoint>),
    Error(HistoryError),
}

impl HistoryState {
    pub fn points(&self) -> Option<&[HistoricalPoint]> {
        match self {
            HistoryState::Ready(points) => Some(points),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&HistoryError> {
        match self {
            HistoryState::Error(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceState {
    pub selection: Selection,
    pub rates: RateState,
    pub history: HistoryState,
}

/// Orchestrates the rate cache and provider for one currency pair.
///
/// Every transition is published as a single update on a watch channel.
/// A load that completes after a newer load of the same kind started is
/// discarded.
pub struct RateService {
    provider: Arc<dyn RateProvider>,
    cache: RateCache,
    state: watch::Sender<ServiceState>,
    rates_generation: AtomicU64,
    history_generation: AtomicU64,
}

impl RateService {
    pub fn new(provider: Arc<dyn RateProvider>, cache: RateCache, selection: Selection) -> Self {
        let (state, _) = watch::channel(ServiceState {
            selection,
            rates: RateState::Idle,
            history: HistoryState::Idle,
        });
        Self {
            provider,
            cache,
            state,
            rates_generation: AtomicU64::new(0),
            history_generation: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ServiceState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ServiceState {
        self.state.borrow().clone()
    }

    pub fn selection(&self) -> Selection {
        self.state.borrow().selection
    }

    /// Loads rates for the current base, serving a fresh cache entry when one exists.
    pub async fn load_rates(&self) {
        self.load_rates_inner(false).await;
    }

    /// Refetches rates for the current base, ignoring the cache.
    pub async fn refresh(&self) {
        info!("Refreshing rates for {}", self.selection().base);
        self.load_rates_inner(true).await;
    }

    pub async fn select_base(&self, base: CurrencyCode) {
        self.state.send_modify(|s| s.selection.base = base);
        tokio::join!(self.load_rates(), self.load_history());
    }

    /// Rate tables are base-relative, so only the history depends on the target.
    pub async fn select_target(&self, target: CurrencyCode) {
        self.state.send_modify(|s| s.selection.target = target);
        self.load_history().await;
    }

    /// Exchanges base and target in one transition without reloading.
    pub fn swap_selection(&self) {
        self.state.send_modify(|s| s.selection = s.selection.swapped());
        debug!("Swapped selection to {:?}", self.selection());
    }

    /// Swaps the pair, then reloads rates and history for it.
    pub async fn swap(&self) {
        self.swap_selection();
        tokio::join!(self.load_rates(), self.load_history());
    }

    pub async fn load_history(&self) {
        let generation = self.history_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Selection { base, target } = self.selection();
        self.state.send_modify(|s| s.history = HistoryState::Loading);

        let today = self.cache.now().date_naive();
        let next = match fetch_history(self.provider.as_ref(), base, target, today).await {
            Ok(points) => HistoryState::Ready(points),
            Err(e) => {
                warn!("History for {}/{} failed: {}", base, target, e);
                HistoryState::Error(e)
            }
        };

        if self.history_generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding superseded history for {}/{}", base, target);
            return;
        }
        self.state.send_modify(|s| s.history = next);
    }

    /// Converts `amount_text` of the base currency into the target using the
    /// current rate table.
    pub fn convert(&self, amount_text: &str) -> Conversion {
        let state = self.state.borrow();
        let Selection { base, target } = state.selection;
        let Some(table) = state.rates.table() else {
            return Conversion::Unavailable;
        };
        let Some(amount) = parse_amount(amount_text) else {
            return Conversion::InvalidAmount;
        };
        if table.base != base {
            return Conversion::Unavailable;
        }
        match (table.rate(target.as_str()), convert(amount, target.as_str(), table)) {
            (Some(rate), Some(value)) => Conversion::Converted {
                amount,
                base,
                target,
                rate,
                value,
            },
            _ => Conversion::RateUnavailable { base, target },
        }
    }

    async fn load_rates_inner(&self, force: bool) {
        let generation = self.rates_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let base = self.selection().base;
        self.state.send_modify(|s| s.rates = RateState::Loading);

        if force {
            self.cache.invalidate(base).await;
        } else if let Some(table) = self.cache.get(base).await {
            self.finish_rates(generation, RateState::Ready(table));
            return;
        }

        let next = match self.provider.latest_rates(base).await {
            Ok(table) => {
                self.cache.put(base, &table, self.cache.now()).await;
                RateState::Ready(table)
            }
            Err(e) => {
                warn!("Fetching rates for {} failed: {}", base, e);
                RateState::Error(e)
            }
        };
        self.finish_rates(generation, next);
    }

    fn finish_rates(&self, generation: u64, next: RateState) {
        if self.rates_generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding superseded rates load");
            return;
        }
        self.state.send_modify(|s| s.rates = next);
    }
}
