use thiserror::Error;

/// API-specific errors for subnetter-api
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("DescribeStacks failed: {0}")]
    DescribeStacks(String),

    #[error("Could not fetch stack {0}")]
    StackNotFound(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
