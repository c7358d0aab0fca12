//! Error types for the upnp module.

use thiserror::Error;

/// Errors that can occur talking to a UPnP device.
#[derive(Debug, Error)]
pub enum UpnpError {
    /// The device answered the action with a SOAP fault.
    #[error("SOAP fault {code}: {description}")]
    SoapFault { code: String, description: String },

    /// The request could not be completed.
    #[error("Connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    /// Non-success status without a SOAP fault body.
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// The device sent something we could not understand.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Socket failure during discovery.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl UpnpError {
    pub fn connection(url: &str, reason: impl Into<String>) -> Self {
        Self::Connection {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidResponse(reason.into())
    }

    /// Whether the device could not be reached or the exchange broke off.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }
}

impl From<quick_xml::Error> for UpnpError {
    fn from(e: quick_xml::Error) -> Self {
        Self::InvalidResponse(format!("malformed XML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_soap_fault_display() {
        let err = UpnpError::SoapFault {
            code: "701".to_string(),
            description: "No such object".to_string(),
        };
        assert_eq!(err.to_string(), "SOAP fault 701: No such object");
        assert!(!err.is_connectivity());
        assert!(UpnpError::connection("http://cam/", "reset").is_connectivity());
    }
}
