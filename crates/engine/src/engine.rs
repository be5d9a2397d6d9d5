//! Context engine façade.
//!
//! Coordinates the orchestrator, the snapshot cache, the classifier, and
//! the composer. The cache lives behind a single async mutex held across
//! the whole check → refresh → write sequence, so concurrent callers can
//! never observe a half-finished refresh or clobber each other's writes.

use chrono::Utc;
use common::config::CacheConfig;
use common::{
    AnswerResult, AvailableData, ContextSummary, Result, ShopOffersFragment, Snapshot,
    SummaryStatus, TemperatureFragment, TrafficFragment, WeatherFragment,
};
use providers::ContextSource;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::cache::{Freshness, SnapshotCache};
use crate::compose::compose;
use crate::intent::classify;
use crate::orchestrator::FetchOrchestrator;

pub struct ContextEngine<W, T, R, S> {
    orchestrator: FetchOrchestrator<W, T, R, S>,
    cache: Mutex<SnapshotCache>,
    serve_stale_on_error: bool,
}

impl<W, T, R, S> ContextEngine<W, T, R, S>
where
    W: ContextSource<Fragment = WeatherFragment> + Send + Sync,
    T: ContextSource<Fragment = TemperatureFragment> + Send + Sync,
    R: ContextSource<Fragment = TrafficFragment> + Send + Sync,
    S: ContextSource<Fragment = ShopOffersFragment> + Send + Sync,
{
    pub fn new(orchestrator: FetchOrchestrator<W, T, R, S>, cache_cfg: &CacheConfig) -> Self {
        Self {
            orchestrator,
            cache: Mutex::new(SnapshotCache::new(cache_cfg.ttl_secs)),
            serve_stale_on_error: cache_cfg.serve_stale_on_error,
        }
    }

    /// Refresh into the locked cache. On failure the slot is untouched.
    async fn refresh_locked(
        &self,
        cache: &mut MutexGuard<'_, SnapshotCache>,
        city: &str,
        country: &str,
    ) -> Result<Snapshot> {
        let snapshot = self.orchestrator.refresh(city, country).await?;
        cache.put(snapshot.clone());
        Ok(snapshot)
    }

    /// Force a refresh and replace the cached snapshot.
    pub async fn fetch_all(&self, city: &str, country: &str) -> Result<Snapshot> {
        let mut cache = self.cache.lock().await;
        self.refresh_locked(&mut cache, city, country).await
    }

    /// Current snapshot for the requested city, refreshing first iff
    /// forced or the cache is empty/stale for that city. A valid read
    /// never triggers a refresh.
    pub async fn get_context(
        &self,
        city: &str,
        country: &str,
        force_refresh: bool,
    ) -> Result<Snapshot> {
        let mut cache = self.cache.lock().await;

        let freshness = cache.freshness(city, country);
        if !force_refresh && freshness == Freshness::Valid {
            debug!("Cache hit for {},{}", city, country);
            let snapshot = cache.snapshot().cloned();
            return snapshot.ok_or_else(|| {
                common::Error::Other("valid cache state without a snapshot".into())
            });
        }

        match self.refresh_locked(&mut cache, city, country).await {
            Ok(snapshot) => Ok(snapshot),
            Err(e) => {
                // Documented opt-in policy: a failed refresh may serve the
                // previous snapshot for the same city instead of erroring.
                if self.serve_stale_on_error {
                    if let Some(stale) = cache.snapshot().filter(|s| {
                        s.metadata.city == city && s.metadata.country == country
                    }) {
                        warn!("Refresh failed for {},{}; serving stale snapshot: {}", city, country, e);
                        return Ok(stale.clone());
                    }
                }
                Err(e)
            }
        }
    }

    /// Answer a free-text query from a fresh snapshot.
    pub async fn answer_query(
        &self,
        query: &str,
        city: &str,
        country: &str,
    ) -> Result<AnswerResult> {
        let snapshot = self.get_context(city, country, false).await?;
        let intents = classify(query);
        debug!("Query {:?} classified as {:?}", query, intents);
        Ok(compose(&snapshot, &intents, query, Utc::now()))
    }

    /// Cache status for monitoring/UI. Not used by the answering path.
    pub async fn context_summary(&self) -> ContextSummary {
        let cache = self.cache.lock().await;

        let Some(snapshot) = cache.snapshot() else {
            return ContextSummary {
                status: SummaryStatus::NoData,
                city: None,
                country: None,
                fetched_at: None,
                cache_valid: false,
                available_data: None,
            };
        };

        let meta = &snapshot.metadata;
        let cache_valid = cache.freshness(&meta.city, &meta.country) == Freshness::Valid;

        ContextSummary {
            status: SummaryStatus::DataAvailable,
            city: Some(meta.city.clone()),
            country: Some(meta.country.clone()),
            fetched_at: cache.fetched_at(),
            cache_valid,
            available_data: Some(AvailableData {
                weather: true,
                traffic: true,
                temperature: true,
                shop_offers: true,
            }),
        }
    }
}
