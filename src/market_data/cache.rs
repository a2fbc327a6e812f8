//! Single-slot, time-windowed cache in front of a slow or rate-limited source.
//!
//! Only the cache state (timestamp + last value) is guarded by a lock. The
//! underlying fetch runs with the lock released, so two callers that miss at
//! the same moment may both hit the upstream. Switch on [`RateLimitedCache::single_flight`]
//! when at most one upstream call per window matters more than latency.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

/// Anything that can produce a fresh `Output` on demand, or fail.
#[async_trait]
pub trait Fetch: Send + Sync {
    type Output: Send + Sync;
    type Error: Send;

    async fn fetch(&self) -> Result<Self::Output, Self::Error>;
}

struct CacheEntry<T> {
    fetched_at: Option<Instant>,
    value: Option<Arc<T>>,
}

pub struct RateLimitedCache<F: Fetch> {
    label: String,
    min_interval: Duration,
    fetcher: F,
    entry: Mutex<CacheEntry<F::Output>>,
    // Present only in single-flight mode
    in_flight: Option<tokio::sync::Mutex<()>>,
}

impl<F: Fetch> RateLimitedCache<F> {
    pub fn new(min_interval: Duration, fetcher: F) -> Self {
        Self {
            label: "unnamed".to_string(),
            min_interval,
            fetcher,
            entry: Mutex::new(CacheEntry { fetched_at: None, value: None }),
            in_flight: None,
        }
    }

    /// Name used in logs and metric labels.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Serialize cache misses so concurrent callers share one upstream call.
    pub fn single_flight(mut self) -> Self {
        self.in_flight = Some(tokio::sync::Mutex::new(()));
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Last successful value, however old.
    pub fn peek(&self) -> Option<Arc<F::Output>> {
        self.entry.lock().value.clone()
    }

    /// Serve the cached value while it is younger than `min_interval`,
    /// otherwise fetch. Errors from the fetcher are returned unchanged and
    /// leave the cache as it was.
    pub async fn get(&self) -> Result<Arc<F::Output>, F::Error> {
        let requested_at = Instant::now();
        if let Some(hit) = self.lookup(requested_at) {
            return Ok(hit);
        }

        match &self.in_flight {
            None => self.refresh(requested_at).await,
            Some(gate) => {
                let _turn = gate.lock().await;
                // whoever held the gate before us may have refreshed already
                let now = Instant::now();
                if let Some(hit) = self.lookup(now) {
                    return Ok(hit);
                }
                self.refresh(now).await
            }
        }
    }

    fn lookup(&self, now: Instant) -> Option<Arc<F::Output>> {
        let entry = self.entry.lock();
        match (entry.fetched_at, &entry.value) {
            (Some(at), Some(value)) if now.saturating_duration_since(at) < self.min_interval => {
                trace!(source = %self.label, age_ms = now.saturating_duration_since(at).as_millis() as u64, "Cache hit");
                metrics::counter!("lobagg_cache_hits_total", "source" => self.label.clone()).increment(1);
                Some(Arc::clone(value))
            }
            _ => None,
        }
    }

    async fn refresh(&self, requested_at: Instant) -> Result<Arc<F::Output>, F::Error> {
        metrics::counter!("lobagg_cache_misses_total", "source" => self.label.clone()).increment(1);
        debug!(source = %self.label, "Cache miss, fetching");

        let value = Arc::new(self.fetcher.fetch().await?);

        let mut entry = self.entry.lock();
        // a slower, older fetch must not roll back a newer entry
        let newer = entry.fetched_at.map_or(true, |at| requested_at >= at);
        if newer {
            entry.fetched_at = Some(requested_at);
            entry.value = Some(Arc::clone(&value));
        }
        Ok(value)
    }
}
