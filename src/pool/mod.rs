mod config;
mod metrics;
mod sweeper;
mod core;

pub use config::PoolConfig;
pub use metrics::{PoolMetrics, PoolMetricsSnapshot};
pub use self::core::TimedPool;
