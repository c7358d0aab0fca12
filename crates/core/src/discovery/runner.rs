//! The discovery loop: scan, drain new cameras, repeat.

use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::cameras::CameraList;
use super::config::DiscoveryConfig;
use crate::context::ExecutionContext;
use crate::session::{CameraSession, SessionReport};
use crate::upnp::{ContentDirectoryConnector, Device, DeviceDiscoverer};

/// Polls the network for cameras and drains each one once per appearance.
pub struct DiscoveryLoop {
    config: DiscoveryConfig,
    context: ExecutionContext,
    discoverer: Arc<dyn DeviceDiscoverer>,
    connector: Arc<dyn ContentDirectoryConnector>,
}

impl DiscoveryLoop {
    pub fn new(
        config: DiscoveryConfig,
        context: ExecutionContext,
        discoverer: Arc<dyn DeviceDiscoverer>,
        connector: Arc<dyn ContentDirectoryConnector>,
    ) -> Self {
        Self {
            config,
            context,
            discoverer,
            connector,
        }
    }

    /// Runs one scan and drains every camera not in `previous`.
    ///
    /// Returns the cameras to skip on the next scan. A camera stays skipped
    /// until it drops off the network, so it is drained again when it comes
    /// back. A failed scan keeps `previous`.
    pub async fn scan_once(&self, previous: &CameraList) -> CameraList {
        let devices = match self.discoverer.discover(self.config.scan_timeout()).await {
            Ok(devices) => devices,
            Err(e) => {
                warn!(discoverer = self.discoverer.name(), error = %e, "Discovery failed");
                return previous.clone();
            }
        };

        let cameras = CameraList::from_devices(devices);
        debug!(cameras = cameras.len(), "Scan complete");

        let mut remembered = Vec::with_capacity(cameras.len());
        for camera in cameras {
            if previous.contains(&camera) {
                remembered.push(camera);
                continue;
            }

            info!("Detected a camera: {}. Downloading media.", camera.friendly_name);
            let Some(report) = self.drain_camera(&camera).await else {
                continue;
            };
            if report.outcome.is_finished() || !self.config.retry_unfinished_cameras {
                remembered.push(camera);
            } else {
                info!(
                    camera = %camera.friendly_name,
                    outcome = %report.outcome,
                    "Session did not finish, camera will be retried"
                );
            }
        }

        CameraList::new(remembered)
    }

    async fn drain_camera(&self, camera: &Device) -> Option<SessionReport> {
        let directory = match self.connector.connect(camera).await {
            Ok(directory) => directory,
            Err(e) => {
                warn!(camera = %camera.friendly_name, error = %e, "Cannot browse camera");
                return None;
            }
        };
        let session = CameraSession::new(&self.context, &camera.friendly_name, directory);
        Some(session.run().await)
    }

    /// Scans until `shutdown` fires. The signal is honoured between scans.
    pub async fn run(&self, mut shutdown: broadcast::Receiver<()>) {
        info!("Downloading media to {}", self.context.output_dir().display());
        info!("Started cameras discovery");
        let mut previous = CameraList::empty();

        loop {
            previous = self.scan_once(&previous).await;

            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    info!("Discovery loop received shutdown signal");
                    break;
                }
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
            }
        }
    }
}
