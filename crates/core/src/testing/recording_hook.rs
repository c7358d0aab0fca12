//! Hook that records session reports.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::hook::SessionHook;
use crate::session::SessionReport;

/// Records every report it is called with.
#[derive(Debug, Clone, Default)]
pub struct RecordingHook {
    reports: Arc<RwLock<Vec<SessionReport>>>,
}

impl RecordingHook {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn reports(&self) -> Vec<SessionReport> {
        self.reports.read().await.clone()
    }
}

#[async_trait]
impl SessionHook for RecordingHook {
    fn name(&self) -> &str {
        "recording"
    }

    async fn on_session_finished(&self, report: &SessionReport) {
        self.reports.write().await.push(report.clone());
    }
}
