//! Configuration for the download module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the verified downloader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloaderConfig {
    /// Directory for in-flight downloads, before verification.
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,

    /// Buffer size for file I/O.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Timeout for establishing a connection to the camera.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Compare a SHA-256 of the committed copy with the downloaded bytes.
    #[serde(default = "default_true")]
    pub verify_copy_checksum: bool,
}

fn default_temp_dir() -> PathBuf {
    std::env::temp_dir().join("lumix-upnp-dump")
}

fn default_buffer_size() -> usize {
    8192
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            buffer_size: default_buffer_size(),
            connect_timeout_secs: default_connect_timeout_secs(),
            verify_copy_checksum: true,
        }
    }
}

impl DownloaderConfig {
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Sets the copy buffer size. Zero is raised to one byte.
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    pub fn with_verify_copy_checksum(mut self, enabled: bool) -> Self {
        self.verify_copy_checksum = enabled;
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}
