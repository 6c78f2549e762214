//! Caller-owned store of detection results
//!
//! Detection itself is pure. A caller that wants to reuse runs keeps an
//! [`OutlierCache`] next to its table: entries are keyed by the table
//! fingerprint and the full request, and the most recent run of each method is
//! remembered so results can be looked up by method name. Storing a run for a
//! new fingerprint drops every entry made against earlier table contents.

use crate::detection::{DetectionParams, OutlierDetection, OutlierSummary};
use crate::OutlierEngine;
use insight_core::{OutlierMethod, Result, Table};
use std::collections::HashMap;
use tracing::debug;

/// Hashable form of a request. Floats are keyed by their bit patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    fingerprint: u64,
    method: OutlierMethod,
    columns: Option<Vec<String>>,
    numbers: Vec<u64>,
}

impl CacheKey {
    fn new(fingerprint: u64, params: &DetectionParams) -> Self {
        let (columns, numbers) = match params {
            DetectionParams::Iqr {
                columns,
                multiplier,
            } => (columns.clone(), vec![multiplier.to_bits()]),
            DetectionParams::ZScore { columns, threshold } => {
                (columns.clone(), vec![threshold.to_bits()])
            }
            DetectionParams::IsolationForest {
                contamination,
                seed,
                trees,
            } => (None, vec![contamination.to_bits(), *seed, *trees as u64]),
        };
        Self {
            fingerprint,
            method: params.method(),
            columns,
            numbers,
        }
    }
}

#[derive(Debug, Default)]
pub struct OutlierCache {
    entries: HashMap<CacheKey, OutlierDetection>,
    latest: HashMap<OutlierMethod, CacheKey>,
}

impl OutlierCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.latest.clear();
    }

    /// Forget runs made against any other table contents.
    fn evict_other_tables(&mut self, fingerprint: u64) {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.fingerprint == fingerprint);
        self.latest.retain(|_, key| key.fingerprint == fingerprint);
        let evicted = before - self.entries.len();
        if evicted > 0 {
            debug!(evicted, "dropped detections for stale table");
        }
    }

    /// Store a detection and make it the latest for its method.
    pub fn insert(&mut self, detection: OutlierDetection) {
        let key = CacheKey::new(detection.fingerprint, &detection.params);
        self.evict_other_tables(key.fingerprint);
        self.latest.insert(detection.method(), key.clone());
        self.entries.insert(key, detection);
    }

    /// Cached run of exactly this request against this table.
    pub fn get(&self, table: &Table, params: &DetectionParams) -> Option<&OutlierDetection> {
        self.entries.get(&CacheKey::new(table.fingerprint(), params))
    }

    /// Run a request, reusing a cached result for the same table and
    /// parameters.
    pub fn detect(&mut self, table: &Table, params: &DetectionParams) -> Result<&OutlierDetection> {
        let key = CacheKey::new(table.fingerprint(), params);
        if !self.entries.contains_key(&key) {
            let detection = OutlierEngine::new(table).detect(params)?;
            self.evict_other_tables(key.fingerprint);
            self.entries.insert(key.clone(), detection);
        } else {
            debug!(method = %params.method(), "outlier cache hit");
        }
        self.latest.insert(params.method(), key.clone());
        // Present: inserted above when missing
        Ok(&self.entries[&key])
    }

    /// Most recent run of a method, if it was made against `table`.
    pub fn latest(&self, table: &Table, method: OutlierMethod) -> Option<&OutlierDetection> {
        let key = self.latest.get(&method)?;
        if key.fingerprint != table.fingerprint() {
            debug!(%method, "cached detection is stale");
            return None;
        }
        self.entries.get(key)
    }

    fn latest_by_name(&self, table: &Table, name: &str) -> Option<&OutlierDetection> {
        let method: OutlierMethod = name.parse().ok()?;
        self.latest(table, method)
    }

    /// Summary of the latest run of the named method. `None` for an unknown
    /// name, a method never run, or a run made against a different table.
    pub fn summary(&self, table: &Table, method: &str) -> Option<OutlierSummary> {
        self.latest_by_name(table, method)
            .map(OutlierDetection::summary)
    }

    /// Rows flagged by the latest run of the named method, empty under the
    /// same conditions as [`Self::summary`].
    pub fn flagged_rows(&self, table: &Table, method: &str) -> Vec<usize> {
        self.latest_by_name(table, method)
            .map(OutlierDetection::flagged_rows)
            .unwrap_or_default()
    }
}
