//! Caller-owned cache for asset symbol lookups.
//!
//! Symbol to id and precision mappings almost never change, but they are
//! not guaranteed immutable either (assets can be re-created on test
//! networks), so entries expire after a TTL. The cache is an ordinary value
//! passed to whoever needs it; there is no process-wide instance.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chain::{AssetAmount, AssetId};

/// What a symbol lookup yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: AssetId,
    pub precision: u8,
}

impl AssetRecord {
    /// Convert a whole-unit quantity into base units, e.g. `1` of a
    /// 5-precision asset is `100000`. `None` on overflow.
    pub fn amount(&self, whole: i64) -> Option<AssetAmount> {
        10i64
            .checked_pow(u32::from(self.precision))
            .and_then(|scale| whole.checked_mul(scale))
            .map(|units| AssetAmount::new(units, self.id))
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    record: AssetRecord,
    inserted: Instant,
}

/// Thread-safe symbol cache with time-based expiry.
#[derive(Debug)]
pub struct ObjectCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, Entry>>,
}

impl ObjectCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// A live entry for `symbol`, if any. Expired entries are ignored but
    /// left for [`purge_expired`](Self::purge_expired).
    pub fn get(&self, symbol: &str) -> Option<AssetRecord> {
        let entries = self.entries.read();
        entries
            .get(symbol)
            .filter(|entry| entry.inserted.elapsed() < self.ttl)
            .map(|entry| entry.record)
    }

    pub fn insert(&self, symbol: impl Into<String>, record: AssetRecord) {
        self.entries.write().insert(
            symbol.into(),
            Entry {
                record,
                inserted: Instant::now(),
            },
        );
    }

    /// Cached value, or the result of `fetch` which is then cached. Errors
    /// from `fetch` are returned as-is and nothing is stored.
    pub fn get_or_fetch<E>(
        &self,
        symbol: &str,
        fetch: impl FnOnce(&str) -> Result<AssetRecord, E>,
    ) -> Result<AssetRecord, E> {
        if let Some(record) = self.get(symbol) {
            return Ok(record);
        }
        debug!(symbol, "asset cache miss");
        let record = fetch(symbol)?;
        self.insert(symbol, record);
        Ok(record)
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, symbol: &str) -> bool {
        self.entries.write().remove(symbol).is_some()
    }

    /// Drop every expired entry and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted.elapsed() < self.ttl);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
