pub mod errors;
pub mod logger;
pub mod pool;

pub use crate::errors::PoolError;
pub use crate::pool::{PoolConfig, PoolMetrics, PoolMetricsSnapshot, TimedPool};

/// Initializes the logging system.
///
/// Optional; call once from binaries or tests that want the pool's debug
/// output (per-sweep expiry counts) on the console.
pub fn init() -> Result<(), Box<dyn std::error::Error>> {
    logger::init()?;
    Ok(())
}
