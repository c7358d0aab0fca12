//! Error classification at the camera session boundary.

use thiserror::Error;

use super::types::SessionOutcome;
use crate::download::DownloadError;
use crate::media::MediaError;
use crate::upnp::UpnpError;
use crate::verify::VerificationError;

/// Why a camera session stopped early.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A downloaded file failed its integrity check.
    #[error(transparent)]
    Verification(VerificationError),

    /// A transfer was cut off mid-flight.
    #[error("{0}")]
    StreamInterrupted(String),

    /// The camera could not be reached.
    #[error("{0}")]
    ConnectivityLost(String),

    /// A catalog item had no usable URL.
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Download(DownloadError),

    #[error(transparent)]
    Upnp(UpnpError),
}

impl SessionError {
    pub fn outcome(&self) -> SessionOutcome {
        match self {
            Self::Verification(_) => SessionOutcome::Aborted,
            Self::StreamInterrupted(_) => SessionOutcome::Interrupted,
            Self::ConnectivityLost(_) => SessionOutcome::Disconnected,
            Self::Media(_) | Self::Download(_) | Self::Upnp(_) => SessionOutcome::Failed,
        }
    }

    /// Whether incomplete files of the current item should be removed.
    ///
    /// Not after a lost connection: the camera may already have deleted the
    /// object whose files were just written.
    pub fn requires_cleanup(&self) -> bool {
        !matches!(self, Self::ConnectivityLost(_))
    }
}

impl From<DownloadError> for SessionError {
    fn from(e: DownloadError) -> Self {
        match e {
            DownloadError::Verification(v) => Self::Verification(v),
            DownloadError::StreamInterrupted { .. } => Self::StreamInterrupted(e.to_string()),
            DownloadError::Connection { .. } => Self::ConnectivityLost(e.to_string()),
            other => Self::Download(other),
        }
    }
}

/// A control endpoint answering with a bare HTTP error is treated like a
/// dropped connection: the camera is shutting down or its server is gone.
impl From<UpnpError> for SessionError {
    fn from(e: UpnpError) -> Self {
        if e.is_connectivity() || matches!(e, UpnpError::HttpStatus { .. }) {
            Self::ConnectivityLost(e.to_string())
        } else {
            Self::Upnp(e)
        }
    }
}

impl From<VerificationError> for SessionError {
    fn from(e: VerificationError) -> Self {
        Self::Verification(e)
    }
}
