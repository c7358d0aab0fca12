//! Error types for the download module.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::verify::VerificationError;

/// Errors that can occur while downloading and verifying a file.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL has no usable file name.
    #[error("Invalid download URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The camera answered with a non-success status.
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    /// The request could not be completed.
    #[error("Connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    /// The response body ended early or the stream broke.
    #[error("Transfer of {url} interrupted: {reason}")]
    StreamInterrupted { url: String, reason: String },

    /// The downloaded bytes are not valid media.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// The committed copy differs from the downloaded bytes.
    #[error("Checksum mismatch for {path}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    /// Local filesystem failure.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn connection(url: &str, reason: impl Into<String>) -> Self {
        Self::Connection {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn interrupted(url: &str, reason: impl Into<String>) -> Self {
        Self::StreamInterrupted {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the camera rejected the request with an HTTP status.
    pub fn is_http_status(&self) -> bool {
        matches!(self, Self::HttpStatus { .. })
    }
}
