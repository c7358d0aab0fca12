//! Error types for the media catalog model.

use thiserror::Error;

/// Errors raised while deriving URLs from a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    /// None of the object's representations carries a usable URL.
    #[error("no usable {kind} representation found for object {object_id}")]
    NoRepresentationFound {
        object_id: String,
        kind: &'static str,
    },
}

impl MediaError {
    pub fn no_representation(object_id: impl Into<String>, kind: &'static str) -> Self {
        Self::NoRepresentationFound {
            object_id: object_id.into(),
            kind,
        }
    }
}
