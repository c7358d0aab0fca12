//! Error type shared by all verifiers.

use std::path::Path;
use thiserror::Error;

/// A downloaded file failed its integrity check.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{verifier} verification failed for {file_name}: {reason}")]
pub struct VerificationError {
    /// Name of the verifier that rejected the file.
    pub verifier: String,
    /// Name of the rejected file.
    pub file_name: String,
    /// What was wrong with it.
    pub reason: String,
}

impl VerificationError {
    pub fn new(verifier: impl Into<String>, path: &Path, reason: impl Into<String>) -> Self {
        Self {
            verifier: verifier.into(),
            file_name: path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            reason: reason.into(),
        }
    }

    /// Replaces the reported file name, e.g. to hide a staging file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}
