//! Error types for the client pool

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PoolError {
    #[error("Wait queue is full - pool is saturated")]
    Saturated,

    #[error("Failed to create pooled client {index}: {reason}")]
    Construction { index: usize, reason: String },
}

pub type PoolResult<T> = Result<T, PoolError>;
