//! Data source implementations for the city-context engine.
//!
//! Each source fetches one fragment of the city snapshot. Shipped sources
//! never return `Err`: any internal failure (missing API key, HTTP error,
//! parse error) substitutes a degraded/mock fragment instead. The `Result`
//! in the contract exists so tests can exercise the orchestrator's
//! all-or-nothing barrier with a misbehaving source.

pub mod shop_offers;
pub mod temperature;
pub mod traffic;
pub mod weather;

use std::future::Future;
use std::sync::Mutex;
use std::time::{Duration, Instant};

pub use shop_offers::ShopOffersSource;
pub use temperature::TemperatureSource;
pub use traffic::TrafficSource;
pub use weather::WeatherSource;

/// Per-source cache window (seconds).
pub const SOURCE_TTL_SECS: u64 = 300;

/// One async data source contributing a fragment to the snapshot.
pub trait ContextSource {
    type Fragment;

    /// Name used in orchestrator failure reports.
    const NAME: &'static str;

    fn fetch(
        &self,
        city: &str,
        country: &str,
    ) -> impl Future<Output = common::Result<Self::Fragment>> + Send;
}

/// Source-local fragment cache with staleness tracking.
///
/// The orchestrator never relies on this — it always calls `fetch` — but a
/// source may serve its last fragment within the TTL to spare the upstream
/// API.
pub struct SourceCache<T> {
    ttl: Duration,
    slot: Mutex<Option<(T, Instant)>>,
}

impl<T: Clone> SourceCache<T> {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            slot: Mutex::new(None),
        }
    }

    /// Last cached fragment, if still within the TTL.
    pub fn get(&self) -> Option<T> {
        let guard = self.slot.lock().expect("source cache lock poisoned");
        guard
            .as_ref()
            .filter(|(_, at)| at.elapsed() < self.ttl)
            .map(|(value, _)| value.clone())
    }

    pub fn put(&self, value: T) {
        let mut guard = self.slot.lock().expect("source cache lock poisoned");
        *guard = Some((value, Instant::now()));
    }
}
