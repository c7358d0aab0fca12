//! ContentDirectory client over SOAP.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::error::UpnpError;
use super::traits::{ContentDirectory, ContentDirectoryConnector};
use super::types::{BrowseRequest, BrowseResponse, Device, CONTENT_DIRECTORY};
use super::xml::{build_action_envelope, parse_browse_response, parse_soap_fault};

const DEFAULT_SERVICE_TYPE: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";

/// SOAP 1.1 client for one ContentDirectory service.
#[derive(Debug, Clone)]
pub struct SoapContentDirectory {
    client: reqwest::Client,
    control_url: String,
    service_type: String,
}

impl SoapContentDirectory {
    pub fn new(client: reqwest::Client, control_url: impl Into<String>) -> Self {
        Self {
            client,
            control_url: control_url.into(),
            service_type: DEFAULT_SERVICE_TYPE.to_string(),
        }
    }

    pub fn with_service_type(mut self, service_type: impl Into<String>) -> Self {
        self.service_type = service_type.into();
        self
    }

    pub fn control_url(&self) -> &str {
        &self.control_url
    }

    /// Invokes `action` and returns the response body.
    async fn call_action(
        &self,
        action: &str,
        args: &[(&str, String)],
    ) -> Result<String, UpnpError> {
        let envelope = build_action_envelope(&self.service_type, action, args);
        let connection =
            |e: reqwest::Error| UpnpError::connection(&self.control_url, e.to_string());

        let response = self
            .client
            .post(&self.control_url)
            .header(CONTENT_TYPE, r#"text/xml; charset="utf-8""#)
            .header("SOAPAction", format!("\"{}#{}\"", self.service_type, action))
            .body(envelope)
            .send()
            .await
            .map_err(connection)?;

        let status = response.status();
        let body = response.text().await.map_err(connection)?;
        debug!(action = %action, status = status.as_u16(), "SOAP action completed");

        if status.is_success() {
            return Ok(body);
        }
        Err(parse_soap_fault(&body).unwrap_or(UpnpError::HttpStatus {
            url: self.control_url.clone(),
            status: status.as_u16(),
        }))
    }
}

#[async_trait]
impl ContentDirectory for SoapContentDirectory {
    async fn browse(&self, request: &BrowseRequest) -> Result<BrowseResponse, UpnpError> {
        let body = self.call_action("Browse", &request.arguments()).await?;
        parse_browse_response(&body)
    }

    async fn destroy_object(&self, object_id: &str) -> Result<(), UpnpError> {
        self.call_action("DestroyObject", &[("ObjectID", object_id.to_string())])
            .await?;
        Ok(())
    }
}

/// Connects to the ContentDirectory service of discovered devices.
#[derive(Debug, Clone)]
pub struct SoapConnector {
    client: reqwest::Client,
}

impl SoapConnector {
    pub fn new(connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ContentDirectoryConnector for SoapConnector {
    async fn connect(&self, device: &Device) -> Result<Arc<dyn ContentDirectory>, UpnpError> {
        let service = device.content_directory().ok_or_else(|| {
            UpnpError::invalid(format!(
                "{} has no {} service",
                device.friendly_name, CONTENT_DIRECTORY
            ))
        })?;
        let client = SoapContentDirectory::new(self.client.clone(), &service.control_url)
            .with_service_type(&service.service_type);
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upnp::Service;

    fn device(services: Vec<Service>) -> Device {
        Device {
            location: "http://192.168.54.1:60606/ddd".to_string(),
            friendly_name: "GH6".to_string(),
            manufacturer: "Panasonic".to_string(),
            device_type: "urn:schemas-upnp-org:device:MediaServer:1".to_string(),
            model_name: "LUMIX".to_string(),
            services,
        }
    }

    #[tokio::test]
    async fn test_connect_requires_content_directory() {
        let connector = SoapConnector::new(Duration::from_secs(1)).unwrap();
        let err = connector.connect(&device(vec![])).await.err().unwrap();
        assert!(err.to_string().contains("ContentDirectory"));

        let with_cd = device(vec![Service {
            service_type: "urn:schemas-upnp-org:service:ContentDirectory:1".to_string(),
            service_id: "urn:upnp-org:serviceId:ContentDirectory".to_string(),
            control_url: "http://192.168.54.1:60606/CDS_control".to_string(),
        }]);
        assert!(connector.connect(&with_cd).await.is_ok());
    }
}
