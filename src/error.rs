use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdoPrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Backend request failed: {0}")]
    Backend(String),

    #[error("Azure DevOps connection is not configured: {0}")]
    NotConfigured(String),

    #[error("No diff is currently open")]
    NoOpenDiff,

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

pub type Result<T> = std::result::Result<T, AdoPrError>;
