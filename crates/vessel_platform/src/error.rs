//! Platform error types

use thiserror::Error;

/// Errors raised by a host runtime while servicing a request
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Host adapter failed to start
    #[error("Host initialization failed: {0}")]
    InitFailed(String),

    /// Resource path was empty or not rooted at `/`
    #[error("Invalid resource path: {0:?}")]
    InvalidPath(String),

    /// Host could not open or map an asset
    #[error("Failed to load asset: {0}")]
    AssetLoad(String),

    /// Host could not release an asset's backing objects
    #[error("Failed to release asset: {0}")]
    AssetRelease(String),

    /// Host audio object failed
    #[error("Audio error: {0}")]
    Audio(String),

    /// Cross-language call into the host failed
    #[error("Host bridge error: {0}")]
    Bridge(String),

    /// Requested service does not exist on this host
    #[error("Not supported on this host: {0}")]
    Unsupported(String),

    /// Filesystem error while resolving host directories
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for host operations
pub type Result<T> = std::result::Result<T, PlatformError>;
