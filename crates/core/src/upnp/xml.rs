//! Device description and SOAP message handling.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::name::LocalName;
use quick_xml::Reader;
use std::collections::HashMap;

use super::error::UpnpError;
use super::types::{BrowseResponse, Device, Service};

const SOAP_ENV_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const SOAP_ENCODING: &str = "http://schemas.xmlsoap.org/soap/encoding/";

fn local(name: LocalName<'_>) -> String {
    String::from_utf8_lossy(name.as_ref()).into_owned()
}

fn path_is(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}

#[derive(Default)]
struct RawService {
    service_type: String,
    service_id: String,
    control_url: String,
}

/// Parses a device description document fetched from `location`.
///
/// Device fields come from the root device. Services of embedded devices are
/// included. Control URLs are resolved against `URLBase` or `location`.
pub fn parse_device_description(xml: &str, location: &str) -> Result<Device, UpnpError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut saw_device = false;
    let mut url_base: Option<String> = None;
    let mut device = Device {
        location: location.to_string(),
        friendly_name: String::new(),
        manufacturer: String::new(),
        device_type: String::new(),
        model_name: String::new(),
        services: Vec::new(),
    };
    let mut raw_services = Vec::new();
    let mut current_service: Option<RawService> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local(e.local_name());
                if name == "service" {
                    current_service = Some(RawService::default());
                }
                path.push(name);
                if path_is(&path, &["root", "device"]) {
                    saw_device = true;
                }
            }
            Event::End(_) => {
                if path.last().map(String::as_str) == Some("service") {
                    if let Some(service) = current_service.take() {
                        raw_services.push(service);
                    }
                }
                path.pop();
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                let text = text.trim();
                if path_is(&path, &["root", "URLBase"]) {
                    url_base = Some(text.to_string());
                } else if path.len() == 3 && path[0] == "root" && path[1] == "device" {
                    match path[2].as_str() {
                        "deviceType" => device.device_type = text.to_string(),
                        "friendlyName" => device.friendly_name = text.to_string(),
                        "manufacturer" => device.manufacturer = text.to_string(),
                        "modelName" => device.model_name = text.to_string(),
                        _ => {}
                    }
                } else if let Some(service) = current_service.as_mut() {
                    let in_service = path.len() >= 2 && path[path.len() - 2] == "service";
                    match path.last().map(String::as_str) {
                        Some("serviceType") if in_service => {
                            service.service_type = text.to_string()
                        }
                        Some("serviceId") if in_service => service.service_id = text.to_string(),
                        Some("controlURL") if in_service => {
                            service.control_url = text.to_string()
                        }
                        _ => {}
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_device {
        return Err(UpnpError::invalid(format!(
            "no root device in description at {}",
            location
        )));
    }

    let base = url_base.as_deref().unwrap_or(location);
    for raw in raw_services {
        if raw.control_url.is_empty() {
            continue;
        }
        device.services.push(Service {
            service_type: raw.service_type,
            service_id: raw.service_id,
            control_url: resolve_url(base, &raw.control_url)?,
        });
    }

    Ok(device)
}

/// Resolves a possibly relative URL against `base`.
pub fn resolve_url(base: &str, url: &str) -> Result<String, UpnpError> {
    let base = reqwest::Url::parse(base)
        .map_err(|e| UpnpError::invalid(format!("bad base URL {}: {}", base, e)))?;
    base.join(url)
        .map(|u| u.to_string())
        .map_err(|e| UpnpError::invalid(format!("bad URL {}: {}", url, e)))
}

/// Builds a SOAP 1.1 request envelope for a UPnP action.
pub fn build_action_envelope(service_type: &str, action: &str, args: &[(&str, String)]) -> String {
    let mut body = String::new();
    for (name, value) in args {
        body.push_str(&format!("<{name}>{}</{name}>", escape(value.as_str())));
    }
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<s:Envelope xmlns:s="{env}" s:encodingStyle="{enc}">"#,
            r#"<s:Body><u:{action} xmlns:u="{service}">{body}</u:{action}></s:Body>"#,
            r#"</s:Envelope>"#
        ),
        env = SOAP_ENV_NS,
        enc = SOAP_ENCODING,
        action = action,
        service = escape(service_type),
        body = body,
    )
}

/// Returns the output arguments of an action response by name.
pub fn parse_action_response(xml: &str) -> Result<HashMap<String, String>, UpnpError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut outputs = HashMap::new();
    let mut saw_response = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                path.push(local(e.local_name()));
                if path.len() == 3 && path[1] == "Body" {
                    saw_response = true;
                }
                if path.len() == 4 && path[1] == "Body" {
                    outputs.insert(path[3].clone(), String::new());
                }
            }
            Event::Empty(e) => {
                if path.len() == 3 && path[1] == "Body" {
                    outputs.insert(local(e.local_name()), String::new());
                } else if path.len() == 2 && path[1] == "Body" {
                    saw_response = true;
                }
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(t) => {
                if path.len() == 4 && path[1] == "Body" {
                    let text = t.unescape()?;
                    if let Some(value) = outputs.get_mut(&path[3]) {
                        value.push_str(&text);
                    }
                }
            }
            Event::CData(c) => {
                if path.len() == 4 && path[1] == "Body" {
                    let bytes = c.into_inner();
                    if let Some(value) = outputs.get_mut(&path[3]) {
                        value.push_str(&String::from_utf8_lossy(&bytes));
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_response {
        return Err(UpnpError::invalid("SOAP envelope has no action response"));
    }
    Ok(outputs)
}

/// Extracts a SOAP fault, preferring the UPnP error code and description.
pub fn parse_soap_fault(xml: &str) -> Option<UpnpError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut path: Vec<String> = Vec::new();
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut in_fault = false;

    loop {
        match reader.read_event().ok()? {
            Event::Start(e) => {
                let name = local(e.local_name());
                if name == "Fault" {
                    in_fault = true;
                }
                path.push(name);
            }
            Event::End(_) => {
                path.pop();
            }
            Event::Text(t) if in_fault => {
                if let (Some(name), Ok(text)) = (path.last(), t.unescape()) {
                    fields.insert(name.clone(), text.trim().to_string());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !in_fault {
        return None;
    }

    let code = fields
        .remove("errorCode")
        .or_else(|| fields.remove("faultcode"))
        .unwrap_or_default();
    let description = fields
        .remove("errorDescription")
        .or_else(|| fields.remove("faultstring"))
        .unwrap_or_default();
    Some(UpnpError::SoapFault { code, description })
}

/// Decodes the outputs of a `Browse` response.
pub fn parse_browse_response(xml: &str) -> Result<BrowseResponse, UpnpError> {
    let mut outputs = parse_action_response(xml)?;

    let number = |outputs: &HashMap<String, String>, name: &str| -> Result<u32, UpnpError> {
        let value = outputs
            .get(name)
            .ok_or_else(|| UpnpError::invalid(format!("Browse response lacks {}", name)))?;
        value
            .trim()
            .parse()
            .map_err(|_| UpnpError::invalid(format!("{} is not a number: '{}'", name, value)))
    };

    Ok(BrowseResponse {
        number_returned: number(&outputs, "NumberReturned")?,
        total_matches: number(&outputs, "TotalMatches")?,
        result: outputs.remove("Result").unwrap_or_default(),
    })
}
