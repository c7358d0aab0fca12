//! Traits for the UPnP collaborators of a session.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use super::error::UpnpError;
use super::types::{BrowseRequest, BrowseResponse, Device};

/// A camera's ContentDirectory service.
#[async_trait]
pub trait ContentDirectory: Send + Sync {
    /// Runs a `Browse` action.
    async fn browse(&self, request: &BrowseRequest) -> Result<BrowseResponse, UpnpError>;

    /// Runs a `DestroyObject` action.
    async fn destroy_object(&self, object_id: &str) -> Result<(), UpnpError>;
}

/// Finds devices on the local network.
#[async_trait]
pub trait DeviceDiscoverer: Send + Sync {
    /// Name of this discoverer.
    fn name(&self) -> &str;

    /// Returns the devices that answered within `timeout`.
    async fn discover(&self, timeout: Duration) -> Result<Vec<Device>, UpnpError>;
}

/// Builds a [`ContentDirectory`] client for a discovered device.
#[async_trait]
pub trait ContentDirectoryConnector: Send + Sync {
    async fn connect(&self, device: &Device) -> Result<Arc<dyn ContentDirectory>, UpnpError>;
}
