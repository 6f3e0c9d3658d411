//! Core business logic abstractions

pub mod cache;
pub mod clock;
pub mod config;
pub mod convert;
pub mod currency;
pub mod history;
pub mod log;
pub mod rates;

// Re-export main types for cleaner imports
pub use cache::{KeyValueStore, RateCache};
pub use clock::{Clock, SystemClock};
pub use convert::Conversion;
pub use currency::CurrencyCode;
pub use rates::{HistoricalPoint, HistoryError, RateFetchError, RateProvider, RateTable};
