//! Camera identification and the list of cameras already handled.

use crate::upnp::Device;

/// Whether `device` is a Lumix camera serving its media over UPnP.
pub fn is_lumix_camera(device: &Device) -> bool {
    device.manufacturer == "Panasonic"
        && device.device_type.contains("MediaServer")
        && device.model_name.to_lowercase().contains("lumix")
}

/// Cameras seen by a scan. Two entries are the same camera when both the
/// description location and the friendly name match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CameraList {
    cameras: Vec<Device>,
}

impl CameraList {
    pub fn new(cameras: Vec<Device>) -> Self {
        Self { cameras }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Keeps only the Lumix cameras among `devices`.
    pub fn from_devices(devices: Vec<Device>) -> Self {
        Self::new(devices.into_iter().filter(is_lumix_camera).collect())
    }

    pub fn contains(&self, device: &Device) -> bool {
        self.cameras
            .iter()
            .any(|c| c.location == device.location && c.friendly_name == device.friendly_name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Device> {
        self.cameras.iter()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }
}

impl IntoIterator for CameraList {
    type Item = Device;
    type IntoIter = std::vec::IntoIter<Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.cameras.into_iter()
    }
}

impl<'a> IntoIterator for &'a CameraList {
    type Item = &'a Device;
    type IntoIter = std::slice::Iter<'a, Device>;

    fn into_iter(self) -> Self::IntoIter {
        self.cameras.iter()
    }
}
