//! In-memory TTL cache for per-domain SEO metrics.
//!
//! SEMrush charges per API line; backlink overviews barely move day to day,
//! so results are held for a configurable TTL (24 h by default).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use rankscope_core::SeoMetrics;

struct CacheEntry {
    inserted_at: Instant,
    metrics: SeoMetrics,
}

pub(crate) struct MetricsCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MetricsCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached metrics for `domain` if still fresh. Stale entries
    /// are evicted on access.
    pub(crate) async fn get(&self, domain: &str) -> Option<SeoMetrics> {
        let mut entries = self.entries.lock().await;
        match entries.get(domain) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.metrics.clone()),
            Some(_) => {
                entries.remove(domain);
                None
            }
            None => None,
        }
    }

    pub(crate) async fn insert(&self, domain: String, metrics: SeoMetrics) {
        let mut entries = self.entries.lock().await;
        entries.insert(
            domain,
            CacheEntry {
                inserted_at: Instant::now(),
                metrics,
            },
        );
    }

    pub(crate) async fn clear(&self) {
        self.entries.lock().await.clear();
    }
}
