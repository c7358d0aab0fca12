//! The verifiers a session uses, one per media kind.

use std::sync::Arc;

use super::config::VerifierConfig;
use super::jpeg::ImageVerifier;
use super::raw::RawVerifier;
use super::traits::Verifier;
use super::video::VideoVerifier;

/// One verifier per downloadable file kind.
#[derive(Clone)]
pub struct VerifierSet {
    pub image: Arc<dyn Verifier>,
    pub raw: Arc<dyn Verifier>,
    pub video: Arc<dyn Verifier>,
}

impl VerifierSet {
    /// Builds the production verifiers.
    pub fn from_config(config: &VerifierConfig) -> Self {
        Self {
            image: Arc::new(ImageVerifier::new()),
            raw: Arc::new(RawVerifier::new()),
            video: Arc::new(VideoVerifier::new(config)),
        }
    }

    /// Uses the same verifier for every kind.
    pub fn uniform(verifier: Arc<dyn Verifier>) -> Self {
        Self {
            image: Arc::clone(&verifier),
            raw: Arc::clone(&verifier),
            video: verifier,
        }
    }
}

impl std::fmt::Debug for VerifierSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerifierSet")
            .field("image", &self.image.name())
            .field("raw", &self.raw.name())
            .field("video", &self.video.name())
            .finish()
    }
}
