use crate::models::BaseNetwork;
use thiserror::Error;

/// Core domain errors - no I/O dependencies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid address block: {0}")]
    InvalidBlock(String),

    #[error("Invalid base network: {0}")]
    InvalidBaseNetwork(String),

    #[error("Too many divisions: requested {requested}, at most {max} allowed")]
    TooManyDivisions { requested: usize, max: usize },
}

/// Errors returned when picking the next free address block.
///
/// `QueryFailed` carries the stack lister's own error untouched so callers can
/// inspect or downcast it; nothing is retried here.
#[derive(Error, Debug)]
pub enum AllocationError {
    #[error("Stack query failed: {0}")]
    QueryFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("No available subnets in {base}: expand address pool")]
    PoolExhausted { base: BaseNetwork },
}

pub type Result<T> = std::result::Result<T, CoreError>;
