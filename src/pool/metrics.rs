use std::sync::atomic::{AtomicU64, Ordering};

/// Simple metrics for observing pool behavior.
#[derive(Default)]
pub struct PoolMetrics {
    pub inserts: AtomicU64,
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub removes: AtomicU64,
    pub swept: AtomicU64,
    pub sweep_ticks: AtomicU64,
}

impl PoolMetrics {
    pub fn snapshot(&self) -> PoolMetricsSnapshot {
        PoolMetricsSnapshot {
            inserts: self.inserts.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            removes: self.removes.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            sweep_ticks: self.sweep_ticks.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PoolMetricsSnapshot {
    pub inserts: u64,
    pub hits: u64,
    pub misses: u64,
    pub removes: u64,
    pub swept: u64,
    pub sweep_ticks: u64,
}
