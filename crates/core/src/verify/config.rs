//! Configuration for the verify module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for media verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Path to the ffprobe binary used for video container probes.
    /// Set to an empty string to only run the built-in MP4 structure check.
    #[serde(default = "default_ffprobe_path", deserialize_with = "deserialize_optional_path")]
    pub ffprobe_path: Option<PathBuf>,
}

fn default_ffprobe_path() -> Option<PathBuf> {
    Some(PathBuf::from("ffprobe"))
}

fn deserialize_optional_path<'de, D>(deserializer: D) -> Result<Option<PathBuf>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()).map(PathBuf::from))
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            ffprobe_path: default_ffprobe_path(),
        }
    }
}

impl VerifierConfig {
    /// Sets the ffprobe binary, or disables the probe with `None`.
    pub fn with_ffprobe_path(mut self, path: Option<PathBuf>) -> Self {
        self.ffprobe_path = path;
        self
    }
}
