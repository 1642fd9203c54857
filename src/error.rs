use thiserror::Error;

/// Failure to resolve a product through the catalog
#[cfg(feature = "api")]
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Catalog request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Catalog request timed out")]
    Timeout,

    #[error("Catalog returned HTTP {0}")]
    Status(u16),

    #[error("No product found for '{0}'")]
    NotFound(String),

    #[error("Invalid catalog response: {0}")]
    InvalidResponse(String),
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to write snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}
