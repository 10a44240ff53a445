//! Durable snapshot tier for the segment cache.
//!
//! Snapshots are best-effort: a failed save is logged and ignored, and a
//! snapshot that cannot be read back as a usable chart is simply a miss.

use crate::weighted::Chart;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Persistence seam for computed charts, keyed by normalized segment key.
pub trait SnapshotStore: Send + Sync {
    /// Load a previously saved chart, or None when absent/unreadable.
    fn load(&self, key: &str) -> Option<Chart>;

    /// Persist a chart. Best-effort; must not panic.
    fn save(&self, key: &str, chart: &Chart);
}

/// Snapshot store that keeps one JSON file per segment key in a directory,
/// e.g. `model/charts/genre_Drama.json`.
pub struct DirSnapshotStore {
    dir: PathBuf,
    prefix: &'static str,
}

impl DirSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>, prefix: &'static str) -> Self {
        Self {
            dir: dir.into(),
            prefix,
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are already normalized; only spaces (title-cased genres)
        // need replacing to stay filename-safe.
        let safe: String = key
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        self.dir.join(format!("{}_{}.json", self.prefix, safe))
    }
}

impl SnapshotStore for DirSnapshotStore {
    fn load(&self, key: &str) -> Option<Chart> {
        let path = self.path_for(key);
        let raw = std::fs::read_to_string(&path).ok()?;
        match serde_json::from_str::<Chart>(&raw) {
            Ok(chart) => {
                debug!("Snapshot hit for \"{}\" ({} rows)", key, chart.len());
                Some(chart)
            }
            Err(e) => {
                warn!("Discarding corrupt snapshot {}: {}", path.display(), e);
                None
            }
        }
    }

    fn save(&self, key: &str, chart: &Chart) {
        let path = self.path_for(key);
        let write = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(&path, serde_json::to_string(chart).unwrap_or_default()));
        if let Err(e) = write {
            warn!("Failed to persist snapshot {}: {}", path.display(), e);
        }
    }
}
