//! Mock verifier.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::verify::{VerificationError, Verifier};

/// Mock implementation of the Verifier trait.
///
/// Accepts or rejects every file and records what it was asked to check.
#[derive(Debug, Clone)]
pub struct MockVerifier {
    reject_reason: Arc<RwLock<Option<String>>>,
    verified: Arc<RwLock<Vec<PathBuf>>>,
}

impl MockVerifier {
    pub fn accepting() -> Self {
        Self {
            reject_reason: Arc::new(RwLock::new(None)),
            verified: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_reason: Arc::new(RwLock::new(Some(reason.into()))),
            verified: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub async fn set_reject_reason(&self, reason: Option<String>) {
        *self.reject_reason.write().await = reason;
    }

    /// Paths passed to `verify`, in order.
    pub async fn verified_files(&self) -> Vec<PathBuf> {
        self.verified.read().await.clone()
    }
}

#[async_trait]
impl Verifier for MockVerifier {
    fn name(&self) -> &str {
        "mock"
    }

    async fn verify(&self, path: &Path) -> Result<(), VerificationError> {
        self.verified.write().await.push(path.to_path_buf());
        match self.reject_reason.read().await.as_ref() {
            Some(reason) => Err(VerificationError::new("mock", path, reason.clone())),
            None => Ok(()),
        }
    }
}
