use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PoolError {
    #[error("pool is full: capacity {max_size}")]
    Full { max_size: usize },

    #[error("key not found")]
    NotFound,
}
