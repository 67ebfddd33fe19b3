use std::time::Duration;

/// Configuration for a [`TimedPool`](crate::pool::TimedPool).
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum number of entries; 0 admits no insertions.
    pub max_size: usize,
    /// TTL applied when an insert does not carry its own.
    pub default_ttl: Duration,
    /// Pause between background sweeps, measured from the end of the
    /// previous sweep's work.
    pub sweep_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_size: 10,
            default_ttl: Duration::from_secs(60 * 60),
            sweep_interval: Duration::from_secs(120),
        }
    }
}

impl PoolConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the capacity ceiling. Negative values are clamped to zero.
    pub fn with_max_size(mut self, max_size: i64) -> Self {
        self.max_size = usize::try_from(max_size).unwrap_or(0);
        self
    }

    /// Sets the TTL used by inserts that do not carry their own.
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Sets the pause between background sweeps.
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Sets the pause between background sweeps in whole seconds. Negative
    /// values are clamped to zero, which makes sweeps run back-to-back.
    pub fn with_sweep_interval_secs(mut self, secs: i64) -> Self {
        self.sweep_interval = Duration::from_secs(u64::try_from(secs).unwrap_or(0));
        self
    }
}
