//! SSDP device discovery.

use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use super::error::UpnpError;
use super::traits::DeviceDiscoverer;
use super::types::Device;
use super::xml::parse_device_description;

/// The SSDP multicast group.
pub const SSDP_MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// Discovers devices with an SSDP `M-SEARCH` for `ssdp:all`.
#[derive(Debug, Clone)]
pub struct SsdpDiscoverer {
    client: reqwest::Client,
    target: SocketAddr,
}

impl SsdpDiscoverer {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            target: SSDP_MULTICAST_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([239, 255, 255, 250], 1900))),
        }
    }

    /// Sends the search to `target` instead of the multicast group.
    pub fn with_target(mut self, target: SocketAddr) -> Self {
        self.target = target;
        self
    }

    async fn search(&self, timeout: Duration) -> Result<Vec<String>, UpnpError> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let message = search_message(&self.target.to_string(), timeout);
        socket.send_to(message.as_bytes(), self.target).await?;

        let deadline = Instant::now() + timeout;
        let mut locations: Vec<String> = Vec::new();
        let mut buffer = [0u8; 2048];

        while let Ok(received) = timeout_at(deadline, socket.recv_from(&mut buffer)).await {
            let (len, from) = received?;
            let response = String::from_utf8_lossy(&buffer[..len]);
            match location_header(&response) {
                Some(location) if !locations.contains(&location) => {
                    debug!(from = %from, location = %location, "SSDP response");
                    locations.push(location);
                }
                _ => {}
            }
        }

        Ok(locations)
    }

    async fn describe(&self, location: &str) -> Result<Device, UpnpError> {
        let connection = |e: reqwest::Error| UpnpError::connection(location, e.to_string());
        let response = self.client.get(location).send().await.map_err(connection)?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpnpError::HttpStatus {
                url: location.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(connection)?;
        parse_device_description(&body, location)
    }
}

#[async_trait]
impl DeviceDiscoverer for SsdpDiscoverer {
    fn name(&self) -> &str {
        "ssdp"
    }

    async fn discover(&self, timeout: Duration) -> Result<Vec<Device>, UpnpError> {
        let locations = self.search(timeout).await?;
        let mut devices = Vec::with_capacity(locations.len());
        for location in locations {
            match self.describe(&location).await {
                Ok(device) => devices.push(device),
                Err(e) => warn!(location = %location, error = %e, "Skipping undescribable device"),
            }
        }
        Ok(devices)
    }
}

fn search_message(host: &str, timeout: Duration) -> String {
    let mx = timeout.as_secs().max(1);
    format!(
        "M-SEARCH * HTTP/1.1\r\nHOST: {}\r\nMAN: \"ssdp:discover\"\r\nMX: {}\r\nST: ssdp:all\r\n\r\n",
        host, mx
    )
}

/// Extracts the `LOCATION` header of an SSDP response.
pub fn location_header(response: &str) -> Option<String> {
    response.lines().find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("location") {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}
