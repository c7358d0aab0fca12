//! UPnP device and ContentDirectory types.

use serde::{Deserialize, Serialize};

/// Service type fragment identifying the ContentDirectory service.
pub const CONTENT_DIRECTORY: &str = "ContentDirectory";

/// A service advertised in a device description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// e.g. `urn:schemas-upnp-org:service:ContentDirectory:1`
    pub service_type: String,
    pub service_id: String,
    /// Absolute control URL.
    pub control_url: String,
}

/// A device found on the network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    /// URL of the device description.
    pub location: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub device_type: String,
    pub model_name: String,
    pub services: Vec<Service>,
}

impl Device {
    /// Finds a service whose type or id contains `name`.
    pub fn service(&self, name: &str) -> Option<&Service> {
        self.services
            .iter()
            .find(|s| s.service_type.contains(name) || s.service_id.contains(name))
    }

    pub fn content_directory(&self) -> Option<&Service> {
        self.service(CONTENT_DIRECTORY)
    }
}

/// Arguments of a ContentDirectory `Browse` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub object_id: String,
    pub browse_flag: String,
    pub filter: String,
    pub starting_index: u32,
    pub requested_count: u32,
    pub sort_criteria: String,
}

impl BrowseRequest {
    /// Lists the direct children of the root container.
    pub fn root_children(starting_index: u32, requested_count: u32) -> Self {
        Self {
            object_id: "0".to_string(),
            browse_flag: "BrowseDirectChildren".to_string(),
            filter: "*".to_string(),
            starting_index,
            requested_count,
            sort_criteria: String::new(),
        }
    }

    /// Action arguments in the order the service declares them.
    pub fn arguments(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ObjectID", self.object_id.clone()),
            ("BrowseFlag", self.browse_flag.clone()),
            ("Filter", self.filter.clone()),
            ("StartingIndex", self.starting_index.to_string()),
            ("RequestedCount", self.requested_count.to_string()),
            ("SortCriteria", self.sort_criteria.clone()),
        ]
    }
}

/// Result of a `Browse` action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseResponse {
    pub number_returned: u32,
    pub total_matches: u32,
    /// DIDL-Lite document.
    pub result: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> Device {
        Device {
            location: "http://192.168.54.1:60606/Server0/ddd".to_string(),
            friendly_name: "DC-S5M2".to_string(),
            manufacturer: "Panasonic".to_string(),
            device_type: "urn:schemas-upnp-org:device:MediaServer:1".to_string(),
            model_name: "LUMIX".to_string(),
            services: vec![
                Service {
                    service_type: "urn:schemas-upnp-org:service:ConnectionManager:1".to_string(),
                    service_id: "urn:upnp-org:serviceId:ConnectionManager".to_string(),
                    control_url: "http://192.168.54.1:60606/Server0/CMS_control".to_string(),
                },
                Service {
                    service_type: "urn:schemas-upnp-org:service:ContentDirectory:1".to_string(),
                    service_id: "urn:upnp-org:serviceId:ContentDirectory".to_string(),
                    control_url: "http://192.168.54.1:60606/Server0/CDS_control".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_content_directory_lookup() {
        let device = device();
        let cd = device.content_directory().unwrap();
        assert!(cd.control_url.ends_with("CDS_control"));
        assert!(device.service("AVTransport").is_none());
    }

    #[test]
    fn test_browse_arguments() {
        let request = BrowseRequest::root_children(20, 10);
        let args = request.arguments();
        assert_eq!(args[0], ("ObjectID", "0".to_string()));
        assert_eq!(args[3], ("StartingIndex", "20".to_string()));
        assert_eq!(args[4], ("RequestedCount", "10".to_string()));
        assert_eq!(args[5], ("SortCriteria", String::new()));
    }
}
