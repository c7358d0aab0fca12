//! Session outcome and report types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a camera session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The catalog was drained.
    Finished,
    /// A file failed verification.
    Aborted,
    /// A transfer was cut off, e.g. by a button press on the camera.
    Interrupted,
    /// The camera went away.
    Disconnected,
    /// Any other error.
    Failed,
}

impl SessionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Aborted => "aborted",
            Self::Interrupted => "interrupted",
            Self::Disconnected => "disconnected",
            Self::Failed => "failed",
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Finished)
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of one camera session, handed to the completion hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReport {
    pub camera_name: String,
    /// Media objects saved and deleted from the camera. A photo counts once
    /// even when both RAW and JPEG were saved.
    pub downloaded: u32,
    /// Objects on the camera before the session, if the camera said.
    pub total_items: Option<u32>,
    pub outcome: SessionOutcome,
    /// Error that ended the session early.
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl SessionReport {
    /// `total_items` as the hook renders it.
    pub fn total_items_display(&self) -> String {
        self.total_items
            .map(|t| t.to_string())
            .unwrap_or_else(|| "-".to_string())
    }
}
