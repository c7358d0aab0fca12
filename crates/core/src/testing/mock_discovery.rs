//! Mock discoverer and connector.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::mock_content_directory::MockContentDirectory;
use crate::upnp::{
    ContentDirectory, ContentDirectoryConnector, Device, DeviceDiscoverer, UpnpError,
};

/// Mock implementation of the DeviceDiscoverer trait.
#[derive(Debug, Clone, Default)]
pub struct MockDiscoverer {
    devices: Arc<RwLock<Vec<Device>>>,
    fail_next: Arc<RwLock<bool>>,
    discover_count: Arc<RwLock<usize>>,
}

impl MockDiscoverer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices(devices: Vec<Device>) -> Self {
        Self {
            devices: Arc::new(RwLock::new(devices)),
            ..Self::default()
        }
    }

    /// Sets the devices every following scan finds.
    pub async fn set_devices(&self, devices: Vec<Device>) {
        *self.devices.write().await = devices;
    }

    /// Makes the next scan fail.
    pub async fn fail_next_discovery(&self) {
        *self.fail_next.write().await = true;
    }

    pub async fn discover_count(&self) -> usize {
        *self.discover_count.read().await
    }
}

#[async_trait]
impl DeviceDiscoverer for MockDiscoverer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn discover(&self, _timeout: Duration) -> Result<Vec<Device>, UpnpError> {
        *self.discover_count.write().await += 1;

        let mut fail_next = self.fail_next.write().await;
        if *fail_next {
            *fail_next = false;
            return Err(UpnpError::Io(std::io::Error::new(
                std::io::ErrorKind::AddrNotAvailable,
                "network is down",
            )));
        }

        Ok(self.devices.read().await.clone())
    }
}

/// Mock implementation of the ContentDirectoryConnector trait.
///
/// Hands out the [`MockContentDirectory`] registered for a device location.
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    directories: Arc<RwLock<HashMap<String, MockContentDirectory>>>,
    connections: Arc<RwLock<Vec<String>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn register(&self, location: &str, directory: MockContentDirectory) {
        self.directories
            .write()
            .await
            .insert(location.to_string(), directory);
    }

    /// Locations of all devices connected to, in order.
    pub async fn connections(&self) -> Vec<String> {
        self.connections.read().await.clone()
    }
}

#[async_trait]
impl ContentDirectoryConnector for MockConnector {
    async fn connect(&self, device: &Device) -> Result<Arc<dyn ContentDirectory>, UpnpError> {
        self.connections.write().await.push(device.location.clone());
        match self.directories.read().await.get(&device.location) {
            Some(directory) => Ok(Arc::new(directory.clone())),
            None => Err(UpnpError::invalid(format!(
                "{} has no ContentDirectory service",
                device.friendly_name
            ))),
        }
    }
}
