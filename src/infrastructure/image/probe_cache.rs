//! In-memory memoization of image probe results.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::OnceCell;
use tracing::{debug, info, trace, warn};

use crate::domain::entities::ImageSize;
use crate::domain::ports::{DimensionLookupPort, ImageProbePort};

/// A probed URL. Empty until its single probe settles; `None` once settled
/// means "probed, no result".
type Entry = Arc<OnceCell<Option<ImageSize>>>;

/// Caches probe results per URL for the lifetime of the instance.
///
/// Concurrent lookups of the same uncached URL share one underlying probe.
/// There is no eviction; call [`ProbeCache::reset`] to drop every entry.
pub struct ProbeCache {
    probe: Arc<dyn ImageProbePort>,
    entries: Mutex<HashMap<String, Entry>>,
    requests: AtomicU64,
    probes: AtomicU64,
}

impl ProbeCache {
    /// Creates an empty cache in front of `probe`.
    #[must_use]
    pub fn new(probe: Arc<dyn ImageProbePort>) -> Self {
        Self {
            probe,
            entries: Mutex::new(HashMap::new()),
            requests: AtomicU64::new(0),
            probes: AtomicU64::new(0),
        }
    }

    /// Returns the size of the image at `url`, probing it at most once.
    ///
    /// Missing or blank URLs return `None` without probing. Probe failures
    /// are logged and cached as `None`.
    pub async fn measure(&self, url: Option<&str>) -> Option<ImageSize> {
        let Some(url) = url.filter(|u| !u.trim().is_empty()) else {
            trace!("No image url to measure");
            return None;
        };

        self.requests.fetch_add(1, Ordering::Relaxed);
        let entry = self.entry(url);

        if let Some(cached) = entry.get() {
            trace!(url = %url, "Probe cache hit");
            return cached.clone();
        }

        entry
            .get_or_init(|| self.probe_once(url))
            .await
            .clone()
    }

    /// Drops every cached result.
    pub fn reset(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        info!(count = count, "Cleared image probe cache");
    }

    /// Returns the number of URLs with a cached or pending entry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Returns true if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let requests = self.requests.load(Ordering::Relaxed);
        let probes = self.probes.load(Ordering::Relaxed);
        let hits = requests.saturating_sub(probes);
        let hit_rate = if requests > 0 {
            (hits as f64 / requests as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            requests,
            probes,
            hits,
            hit_rate,
            size: self.len(),
        }
    }

    /// Returns the entry for `url`, inserting a pending one on first sight.
    fn entry(&self, url: &str) -> Entry {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.get(url) {
            return Arc::clone(existing);
        }
        let entry = Entry::default();
        entries.insert(url.to_string(), Arc::clone(&entry));
        entry
    }

    async fn probe_once(&self, url: &str) -> Option<ImageSize> {
        self.probes.fetch_add(1, Ordering::Relaxed);
        debug!(url = %url, "Probe cache miss, probing image");

        match self.probe.probe(url).await {
            Ok(size) if size.is_usable() => {
                debug!(
                    url = %url,
                    width = size.width,
                    height = size.height,
                    format = %size.format,
                    "Probed image size"
                );
                Some(size)
            }
            Ok(size) => {
                debug!(url = %url, width = size.width, height = size.height, "Probe returned empty size");
                None
            }
            Err(e) if e.is_network_error() => {
                warn!(url = %url, error = %e, "Failed to fetch image for probing");
                None
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Failed to probe image size");
                None
            }
        }
    }
}

impl std::fmt::Debug for ProbeCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DimensionLookupPort for ProbeCache {
    async fn measure(&self, url: Option<&str>) -> Option<ImageSize> {
        Self::measure(self, url).await
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Lookups with a usable URL.
    pub requests: u64,
    /// Underlying probes actually issued.
    pub probes: u64,
    /// Lookups answered without a new probe.
    pub hits: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached URLs.
    pub size: usize,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Probe cache: {} urls, {:.1}% hit rate ({} requests, {} probes)",
            self.size, self.hit_rate, self.requests, self.probes
        )
    }
}
