/// Memoized table loading
///
/// Tables are cached by source path for the lifetime of the cache. There is
/// no automatic invalidation: callers that need fresher data either use a new
/// path or bust the entry explicitly with `invalidate` / `clear`.
///
/// Failed loads are never cached, so a missing file that later appears is
/// picked up by the next `load`.

use crate::error::LoadError;
use crate::table::SalesTable;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Process-wide, read-mostly cache of loaded sales tables.
///
/// Tables are handed out as `Arc<SalesTable>` and are immutable, so any
/// number of sessions can read the same table concurrently.
#[derive(Default)]
pub struct TableCache {
    tables: RwLock<HashMap<PathBuf, Arc<SalesTable>>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the table at `path`, reusing the cached copy when present.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Arc<SalesTable>, LoadError> {
        let path = path.as_ref();

        if let Some(table) = self.read().get(path) {
            log::debug!("Table cache hit for '{}'", path.display());
            return Ok(Arc::clone(table));
        }

        log::debug!("Table cache miss for '{}'", path.display());
        let table = match SalesTable::from_path(path) {
            Ok(table) => Arc::new(table),
            Err(e) => {
                log::warn!("Loading '{}' failed: {}", path.display(), e);
                return Err(e);
            }
        };

        // Another session may have loaded the same path meanwhile; keep the
        // first entry so every caller shares one table.
        let mut tables = self.write();
        let entry = tables.entry(path.to_path_buf()).or_insert(table);
        Ok(Arc::clone(entry))
    }

    /// Drop the cached table for `path`. Returns true if an entry existed.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        let removed = self.write().remove(path.as_ref()).is_some();
        if removed {
            log::info!("Invalidated cached table '{}'", path.as_ref().display());
        }
        removed
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.write().clear();
    }

    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.read().contains_key(path.as_ref())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, Arc<SalesTable>>> {
        self.tables.read().unwrap_or_else(|poisoned| {
            log::warn!("Table cache read lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, Arc<SalesTable>>> {
        self.tables.write().unwrap_or_else(|poisoned| {
            log::warn!("Table cache write lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}
