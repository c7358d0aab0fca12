//! Configuration for the discovery loop.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Discovery loop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// How long each SSDP scan waits for answers.
    #[serde(default = "default_scan_timeout_ms")]
    pub scan_timeout_ms: u64,

    /// Pause between scans.
    #[serde(default)]
    pub poll_interval_ms: u64,

    /// Forget cameras whose session did not finish, so the next scan that
    /// still sees them starts a new session.
    #[serde(default)]
    pub retry_unfinished_cameras: bool,
}

fn default_scan_timeout_ms() -> u64 {
    1000
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            scan_timeout_ms: default_scan_timeout_ms(),
            poll_interval_ms: 0,
            retry_unfinished_cameras: false,
        }
    }
}

impl DiscoveryConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_millis(self.scan_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn with_retry_unfinished_cameras(mut self, retry: bool) -> Self {
        self.retry_unfinished_cameras = retry;
        self
    }
}
