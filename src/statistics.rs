//! Statistics accumulator
//!
//! Counts held handles per category (uppercased unit tag) plus a `TOTAL`.
//! The accumulator is owned by the collection and recomputed from the full
//! handle list each time its hook stage runs, so the report does not depend
//! on how many `add` calls contributed the handles.

use crate::handle::Handle;
use std::collections::BTreeMap;
use std::fmt;

/// Key of the synthetic total counter
pub const TOTAL: &str = "TOTAL";

/// Category key to count
pub type StatMap = BTreeMap<String, i64>;

/// Run once per handle against the map
pub type PerHandleStat = Box<dyn Fn(&Handle, &mut StatMap) -> anyhow::Result<()> + Send + Sync>;

/// Run after every per-handle pass
pub type RollingStat = Box<dyn Fn(&mut StatMap) -> anyhow::Result<()> + Send + Sync>;

pub struct Statistics {
    counts: StatMap,
    per_handle: Vec<PerHandleStat>,
    rolling: Vec<RollingStat>,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    pub fn new() -> Self {
        let mut counts = StatMap::new();
        counts.insert(TOTAL.to_string(), 0);
        Self {
            counts,
            per_handle: Vec::new(),
            rolling: Vec::new(),
        }
    }

    pub fn with_per_handle<F>(mut self, f: F) -> Self
    where
        F: Fn(&Handle, &mut StatMap) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.per_handle.push(Box::new(f));
        self
    }

    pub fn with_rolling<F>(mut self, f: F) -> Self
    where
        F: Fn(&mut StatMap) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.rolling.push(Box::new(f));
        self
    }

    /// Category key for a handle
    pub fn category_key(handle: &Handle) -> String {
        handle.unit().value.to_uppercase()
    }

    /// Recount from scratch over `handles`; ignored handles are skipped.
    pub fn tally(&mut self, handles: &[Handle]) -> anyhow::Result<()> {
        self.reset();
        for handle in handles.iter().filter(|h| !h.ignored()) {
            *self.counts.entry(Self::category_key(handle)).or_insert(0) += 1;
            *self.counts.entry(TOTAL.to_string()).or_insert(0) += 1;
            for f in &self.per_handle {
                f(handle, &mut self.counts)?;
            }
            for f in &self.rolling {
                f(&mut self.counts)?;
            }
        }
        Ok(())
    }

    pub fn report(&self) -> &StatMap {
        &self.counts
    }

    pub fn get(&self, key: &str) -> i64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn total(&self) -> i64 {
        self.get(TOTAL)
    }

    /// Clear every counter, leaving `TOTAL` at zero.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.counts.insert(TOTAL.to_string(), 0);
    }
}

impl fmt::Debug for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Statistics")
            .field("counts", &self.counts)
            .field("per_handle", &self.per_handle.len())
            .field("rolling", &self.rolling.len())
            .finish()
    }
}
