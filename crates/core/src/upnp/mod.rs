//! Minimal UPnP client: SSDP discovery, device descriptions and the
//! ContentDirectory `Browse`/`DestroyObject` actions.

mod error;
mod soap;
mod ssdp;
mod traits;
mod types;
pub mod xml;

pub use error::UpnpError;
pub use soap::{SoapConnector, SoapContentDirectory};
pub use ssdp::{location_header, SsdpDiscoverer, SSDP_MULTICAST_ADDR};
pub use traits::{ContentDirectory, ContentDirectoryConnector, DeviceDiscoverer};
pub use types::{BrowseRequest, BrowseResponse, Device, Service, CONTENT_DIRECTORY};
