//! The two-tier segment cache.
//!
//! Tier one is an in-process map from normalized segment key to its chart;
//! tier two is an optional [`SnapshotStore`]. A segment is computed at most
//! once per process under normal operation: first access checks memory, then
//! the snapshot, then runs the compute closure and writes through both
//! tiers.
//!
//! Concurrency contract: racing first-accesses for the same key may both
//! compute. That is acceptable: chart computation is a pure function of the
//! segment, so both results are equivalent and the last write wins without
//! corruption. No per-key lock is taken.

use crate::snapshot::SnapshotStore;
use crate::weighted::Chart;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Process-lifetime memo of computed charts, with an optional durable tier.
pub struct SegmentCache {
    entries: RwLock<HashMap<String, Arc<Chart>>>,
    snapshot: Option<Box<dyn SnapshotStore>>,
}

impl SegmentCache {
    /// Memory-only cache.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            snapshot: None,
        }
    }

    /// Cache backed by a durable snapshot tier.
    pub fn with_snapshot(store: impl SnapshotStore + 'static) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            snapshot: Some(Box::new(store)),
        }
    }

    /// Look up `key`, falling back to the snapshot tier and finally to
    /// `compute`. A successful compute is written through both tiers; a
    /// compute error is returned untouched and nothing is cached.
    ///
    /// The key must already be normalized by the caller (the segment
    /// resolvers' normalizers), so spelling variants of one segment share an
    /// entry.
    ///
    /// A snapshot that is empty or unreadable counts as a miss rather than a
    /// cached empty result; a persisted failure must not become permanent.
    pub fn get_or_compute<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<Chart, E>,
    ) -> Result<Arc<Chart>, E> {
        if let Some(found) = self.entries.read().expect("cache lock poisoned").get(key) {
            debug!("Cache hit for \"{}\"", key);
            return Ok(Arc::clone(found));
        }

        if let Some(store) = &self.snapshot {
            if let Some(chart) = store.load(key) {
                if chart.is_empty() {
                    debug!("Ignoring empty snapshot for \"{}\"", key);
                } else {
                    let chart = Arc::new(chart);
                    self.insert(key, Arc::clone(&chart));
                    return Ok(chart);
                }
            }
        }

        debug!("Cache miss for \"{}\", computing", key);
        let chart = Arc::new(compute()?);
        self.insert(key, Arc::clone(&chart));
        if let (Some(store), false) = (&self.snapshot, chart.is_empty()) {
            store.save(key, &chart);
        }
        Ok(chart)
    }

    fn insert(&self, key: &str, chart: Arc<Chart>) {
        self.entries
            .write()
            .expect("cache lock poisoned")
            .insert(key.to_string(), chart);
    }

    /// Number of memoized segments (diagnostics)
    pub fn len(&self) -> usize {
        self.entries.read().expect("cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SegmentCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weighted::ChartRow;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn row(id: u32) -> ChartRow {
        ChartRow {
            movie_id: id,
            title: format!("Movie {id}"),
            year: Some(2000),
            vote_count: 100,
            vote_average: 7.0,
            popularity: 1.0,
            weighted_rating: Some(7.0),
        }
    }

    #[test]
    fn test_second_access_skips_compute() {
        let cache = SegmentCache::new();
        let calls = AtomicUsize::new(0);

        let compute = || -> Result<Chart, Infallible> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![row(1)])
        };

        let first = cache.get_or_compute("Drama", compute).unwrap();
        let second = cache
            .get_or_compute("Drama", || -> Result<Chart, Infallible> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![row(2)])
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(second[0].movie_id, 1);
    }

    #[test]
    fn test_distinct_keys_compute_independently() {
        let cache = SegmentCache::new();
        let calls = AtomicUsize::new(0);

        for key in ["Drama", "Comedy"] {
            cache
                .get_or_compute(key, || -> Result<Chart, Infallible> {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![row(1)])
                })
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_compute_error_caches_nothing() {
        let cache = SegmentCache::new();

        let result: Result<_, &str> = cache.get_or_compute("tomhanks", || Err("no movies"));
        assert_eq!(result.unwrap_err(), "no movies");
        assert!(cache.is_empty());

        // A later successful compute still runs.
        let ok = cache
            .get_or_compute("tomhanks", || Ok::<_, &str>(vec![row(3)]))
            .unwrap();
        assert_eq!(ok[0].movie_id, 3);
    }

    struct FixedSnapshot(Chart);

    impl SnapshotStore for FixedSnapshot {
        fn load(&self, _key: &str) -> Option<Chart> {
            Some(self.0.clone())
        }
        fn save(&self, _key: &str, _chart: &Chart) {}
    }

    #[test]
    fn test_snapshot_hit_skips_compute() {
        let cache = SegmentCache::with_snapshot(FixedSnapshot(vec![row(9)]));
        let calls = AtomicUsize::new(0);

        let chart = cache
            .get_or_compute("Drama", || -> Result<Chart, Infallible> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![row(1)])
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(chart[0].movie_id, 9);
    }

    #[test]
    fn test_empty_snapshot_is_a_miss() {
        let cache = SegmentCache::with_snapshot(FixedSnapshot(Vec::new()));
        let calls = AtomicUsize::new(0);

        let chart = cache
            .get_or_compute("Drama", || -> Result<Chart, Infallible> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![row(1)])
            })
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(chart[0].movie_id, 1);
    }
}
