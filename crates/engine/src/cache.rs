//! Single-slot snapshot cache with staleness tracking.
//!
//! Exactly one city context is cached at a time: requesting a different
//! city always forces a refresh even inside the TTL window. Callers hold
//! the cache behind the engine's mutex; there is no interior locking here.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use common::Snapshot;

/// Result of the freshness predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// No snapshot has ever been stored.
    Empty,
    /// Snapshot matches the requested city/country and is inside the TTL.
    Valid,
    /// Snapshot exists but is expired or describes a different city.
    Stale,
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    snapshot: Snapshot,
    stored_at: Instant,
}

#[derive(Debug)]
pub struct SnapshotCache {
    ttl: Duration,
    slot: Option<CachedSnapshot>,
}

impl SnapshotCache {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_secs),
            slot: None,
        }
    }

    /// Freshness of the cached snapshot for the requested city/country.
    pub fn freshness(&self, city: &str, country: &str) -> Freshness {
        self.freshness_at(city, country, Instant::now())
    }

    fn freshness_at(&self, city: &str, country: &str, now: Instant) -> Freshness {
        let Some(cached) = &self.slot else {
            return Freshness::Empty;
        };

        let meta = &cached.snapshot.metadata;
        let within_ttl = now.duration_since(cached.stored_at) < self.ttl;
        if within_ttl && meta.city == city && meta.country == country {
            Freshness::Valid
        } else {
            Freshness::Stale
        }
    }

    /// Replace the slot wholesale. Partial updates do not exist.
    pub fn put(&mut self, snapshot: Snapshot) {
        self.slot = Some(CachedSnapshot {
            snapshot,
            stored_at: Instant::now(),
        });
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.slot.as_ref().map(|c| &c.snapshot)
    }

    pub fn is_empty(&self) -> bool {
        self.slot.is_none()
    }

    /// Wall-clock fetch time of the cached snapshot.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.snapshot().map(|s| s.metadata.fetched_at)
    }
}
