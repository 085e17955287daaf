use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::data::loader::load_snapshot;
use crate::data::model::Snapshot;

// ---------------------------------------------------------------------------
// Snapshot cache
// ---------------------------------------------------------------------------

/// Identity of a pair of sources. Paths are canonicalised when possible so
/// `./a.csv` and `a.csv` share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SourceKey {
    sales: PathBuf,
    customers: PathBuf,
}

impl SourceKey {
    fn new(sales: &Path, customers: &Path) -> Self {
        let canonical = |p: &Path| std::fs::canonicalize(p).unwrap_or_else(|_| p.to_path_buf());
        SourceKey {
            sales: canonical(sales),
            customers: canonical(customers),
        }
    }
}

/// Loads each source pair at most once and hands out shared snapshots.
///
/// Owned by the caller and passed around explicitly. The lock is held for
/// the whole first load, so concurrent first accesses wait for one load
/// instead of racing.
#[derive(Debug, Default)]
pub struct SnapshotCache {
    entries: Mutex<HashMap<SourceKey, Arc<Snapshot>>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot for these sources, loading it on first use.
    /// A failed load is not cached.
    pub fn load(&self, sales: &Path, customers: &Path) -> Result<Arc<Snapshot>> {
        let key = SourceKey::new(sales, customers);
        // A panic mid-load leaves the map unchanged, so a poisoned lock is still usable.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(snapshot) = entries.get(&key) {
            log::debug!("snapshot cache hit for {}", key.sales.display());
            return Ok(Arc::clone(snapshot));
        }

        let snapshot = Arc::new(load_snapshot(sales, customers)?);
        entries.insert(key, Arc::clone(&snapshot));
        Ok(snapshot)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
