//! Concurrent snapshot refresh.
//!
//! Issues the four source fetches concurrently and joins at a barrier:
//! either every fragment arrives and one snapshot is assembled, or the
//! refresh fails and no partial snapshot exists. The whole fan-out runs
//! under a single deadline so a hung source cannot stall a refresh
//! forever.

use std::time::Duration;

use chrono::Utc;
use common::{
    Error, Result, ShopOffersFragment, Snapshot, SnapshotMetadata, TemperatureFragment,
    TrafficFragment, WeatherFragment,
};
use providers::ContextSource;
use tracing::{debug, info};

pub struct FetchOrchestrator<W, T, R, S> {
    weather: W,
    temperature: T,
    traffic: R,
    shop_offers: S,
    refresh_timeout: Duration,
}

impl<W, T, R, S> FetchOrchestrator<W, T, R, S>
where
    W: ContextSource<Fragment = WeatherFragment> + Send + Sync,
    T: ContextSource<Fragment = TemperatureFragment> + Send + Sync,
    R: ContextSource<Fragment = TrafficFragment> + Send + Sync,
    S: ContextSource<Fragment = ShopOffersFragment> + Send + Sync,
{
    pub fn new(
        weather: W,
        temperature: T,
        traffic: R,
        shop_offers: S,
        refresh_timeout_secs: u64,
    ) -> Self {
        Self {
            weather,
            temperature,
            traffic,
            shop_offers,
            refresh_timeout: Duration::from_secs(refresh_timeout_secs),
        }
    }

    /// Fetch all four fragments concurrently and assemble one snapshot.
    ///
    /// All-or-nothing: a failed or timed-out fetch aborts the refresh and
    /// no snapshot is produced. The metadata carries the *requested*
    /// city/country, not whatever a source echoed back, and the fetch
    /// completion time. No retries; the caller sees the failure once.
    pub async fn refresh(&self, city: &str, country: &str) -> Result<Snapshot> {
        debug!("Refreshing snapshot for {},{}", city, country);

        let fan_out = async {
            tokio::join!(
                self.weather.fetch(city, country),
                self.temperature.fetch(city, country),
                self.traffic.fetch(city, country),
                self.shop_offers.fetch(city, country),
            )
        };

        let (weather, temperature, traffic, shop_offers) =
            tokio::time::timeout(self.refresh_timeout, fan_out)
                .await
                .map_err(|_| Error::RefreshTimeout {
                    elapsed_secs: self.refresh_timeout.as_secs(),
                })?;

        let snapshot = Snapshot {
            weather: weather.map_err(|e| source_failure(W::NAME, e))?,
            temperature: temperature.map_err(|e| source_failure(T::NAME, e))?,
            traffic: traffic.map_err(|e| source_failure(R::NAME, e))?,
            shop_offers: shop_offers.map_err(|e| source_failure(S::NAME, e))?,
            metadata: SnapshotMetadata {
                city: city.to_string(),
                country: country.to_string(),
                fetched_at: Utc::now(),
            },
        };

        info!("Snapshot refreshed for {},{}", city, country);
        Ok(snapshot)
    }
}

fn source_failure(source_name: &'static str, err: Error) -> Error {
    Error::SourceFailure {
        source_name,
        message: err.to_string(),
    }
}
