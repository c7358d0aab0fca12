//! Still image verification.

use async_trait::async_trait;
use image::{GenericImageView, ImageReader};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::VerificationError;
use super::traits::Verifier;

const NAME: &str = "image";

/// Verifies still images by fully decoding them.
///
/// A header check alone accepts truncated JPEGs, so the whole scan is decoded.
#[derive(Debug, Clone, Default)]
pub struct ImageVerifier;

impl ImageVerifier {
    pub fn new() -> Self {
        Self
    }

    fn decode(path: &Path) -> Result<(u32, u32), VerificationError> {
        let fail = |reason: String| VerificationError::new(NAME, path, reason);

        let reader = ImageReader::open(path)
            .map_err(|e| fail(format!("cannot open file: {}", e)))?
            .with_guessed_format()
            .map_err(|e| fail(format!("cannot read header: {}", e)))?;

        let image = reader
            .decode()
            .map_err(|e| fail(format!("decode failed: {}", e)))?;

        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(fail(format!("image has empty dimensions {}x{}", width, height)));
        }
        Ok((width, height))
    }
}

#[async_trait]
impl Verifier for ImageVerifier {
    fn name(&self) -> &str {
        NAME
    }

    async fn verify(&self, path: &Path) -> Result<(), VerificationError> {
        let owned: PathBuf = path.to_path_buf();
        let (width, height) = tokio::task::spawn_blocking(move || Self::decode(&owned))
            .await
            .map_err(|e| VerificationError::new(NAME, path, format!("decoder task failed: {}", e)))??;

        debug!(file = %path.display(), width, height, "Image decoded");
        Ok(())
    }
}
