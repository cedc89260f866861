//! Error types for QR generation and logo resolution

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for qrlogo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a QR code
#[derive(Error, Debug)]
pub enum Error {
    /// `--logo` and `--no-logo` were both requested
    #[error("Invalid option: --logo cannot be used together with --no-logo")]
    ConflictingOptions,

    /// The explicitly requested logo could not be read or decoded
    #[error("Failed to load logo {}: {source}", .path.display())]
    LogoLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The QR encoder rejected the payload
    #[error("QR encoding failed: {0}")]
    Encode(String),

    /// The output artifact could not be written
    #[error("Failed to write {}: {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to set up the HTTP client
    #[error("Initialization failed: {0}")]
    InitializationError(String),

    /// Network error
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Writing user-facing output failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<qrcode::types::QrError> for Error {
    fn from(err: qrcode::types::QrError) -> Self {
        Error::Encode(err.to_string())
    }
}
