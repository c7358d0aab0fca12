//! Trait definitions for the verify module.

use async_trait::async_trait;
use std::path::Path;

use super::error::VerificationError;

/// Checks that a file on disk is structurally valid media.
#[async_trait]
pub trait Verifier: Send + Sync {
    /// Returns the name of this verifier implementation.
    fn name(&self) -> &str;

    /// Verifies the file at `path`.
    async fn verify(&self, path: &Path) -> Result<(), VerificationError>;
}
