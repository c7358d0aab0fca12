//! Common test utilities: an in-process camera.
//!
//! [`CameraServer`] serves media files and a ContentDirectory control
//! endpoint over real HTTP, the way a camera does. [`TruncatingServer`]
//! announces a body and hangs up halfway through it.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path as UrlPath, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use lumixdump_core::{
    DownloaderConfig, Downloader, ExecutionContext, VerifierSet, WhatToDownload,
};

/// Re-export fixtures for test convenience
pub use lumixdump_core::testing::fixtures;

/// A SOAP request received by the control endpoint.
#[derive(Debug, Clone)]
pub struct SoapCall {
    pub soap_action: Option<String>,
    pub body: String,
}

#[derive(Clone, Default)]
struct ServerState {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    requested: Arc<RwLock<Vec<String>>>,
    soap_reply: Arc<RwLock<(u16, String)>>,
    soap_calls: Arc<RwLock<Vec<SoapCall>>>,
    description: Arc<RwLock<String>>,
}

/// HTTP server standing in for a camera.
pub struct CameraServer {
    pub base_url: String,
    state: ServerState,
}

impl CameraServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind camera server");
        let addr = listener.local_addr().expect("Failed to read local address");
        let state = ServerState::default();

        let app = Router::new()
            .route("/ddd", get(serve_description))
            .route("/CDS_control", post(control))
            .route("/{name}", get(serve_file))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("camera server failed");
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    pub async fn put_file(&self, name: &str, bytes: Vec<u8>) {
        self.state.files.write().await.insert(name.to_string(), bytes);
    }

    /// Paths of all file requests, in order.
    pub async fn requested_files(&self) -> Vec<String> {
        self.state.requested.read().await.clone()
    }

    pub async fn set_soap_reply(&self, status: u16, body: impl Into<String>) {
        *self.state.soap_reply.write().await = (status, body.into());
    }

    pub async fn soap_calls(&self) -> Vec<SoapCall> {
        self.state.soap_calls.read().await.clone()
    }

    pub async fn set_description(&self, xml: impl Into<String>) {
        *self.state.description.write().await = xml.into();
    }
}

async fn serve_file(State(state): State<ServerState>, UrlPath(name): UrlPath<String>) -> Response {
    state.requested.write().await.push(name.clone());
    match state.files.read().await.get(&name) {
        Some(bytes) => (StatusCode::OK, bytes.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve_description(State(state): State<ServerState>) -> Response {
    let xml = state.description.read().await.clone();
    if xml.is_empty() {
        return StatusCode::NOT_FOUND.into_response();
    }
    ([("content-type", "text/xml")], xml).into_response()
}

async fn control(State(state): State<ServerState>, headers: HeaderMap, body: Bytes) -> Response {
    state.soap_calls.write().await.push(SoapCall {
        soap_action: headers
            .get("soapaction")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).into_owned(),
    });
    let (status, reply) = state.soap_reply.read().await.clone();
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);
    (status, [("content-type", "text/xml")], reply).into_response()
}

/// Announces `full_len` bytes, sends `sent` of them, then closes.
///
/// Paths registered with [`TruncatingServer::start_with_intact`] are served
/// in full instead.
pub struct TruncatingServer {
    pub base_url: String,
}

impl TruncatingServer {
    pub async fn start(body: Vec<u8>, sent: usize) -> Self {
        Self::start_with_intact(body, sent, Vec::new()).await
    }

    pub async fn start_with_intact(
        body: Vec<u8>,
        sent: usize,
        intact: Vec<(String, Vec<u8>)>,
    ) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind truncating server");
        let addr = listener.local_addr().expect("Failed to read local address");
        let intact: Arc<HashMap<String, Vec<u8>>> = Arc::new(intact.into_iter().collect());

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let body = body.clone();
                let intact = Arc::clone(&intact);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => request.extend_from_slice(&buf[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&request);
                    let name = request
                        .split_whitespace()
                        .nth(1)
                        .unwrap_or("/")
                        .trim_start_matches('/')
                        .to_string();
                    let (payload, sent) = match intact.get(&name) {
                        Some(full) => (full.clone(), full.len()),
                        None => (body, sent),
                    };
                    let head = format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                        payload.len()
                    );
                    let _ = socket.write_all(head.as_bytes()).await;
                    let _ = socket.write_all(&payload[..sent.min(payload.len())]).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
        }
    }

    pub fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }
}

/// Output and staging directories for one test.
pub struct Dirs {
    pub root: TempDir,
}

impl Dirs {
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn output(&self) -> std::path::PathBuf {
        self.root.path().join("out")
    }

    pub fn staging(&self) -> std::path::PathBuf {
        self.root.path().join("staging")
    }

    pub fn downloader(&self) -> Downloader {
        Downloader::new(DownloaderConfig::default().with_temp_dir(self.staging()))
            .expect("Failed to build downloader")
    }

    pub fn context(&self, verifiers: VerifierSet, what: WhatToDownload) -> ExecutionContext {
        std::fs::create_dir_all(self.output()).expect("Failed to create output dir");
        ExecutionContext::new(self.output(), self.downloader(), verifiers)
            .with_what_to_download(what)
    }
}

/// File names in `dir`, sorted. A missing directory is empty.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    };
    names.sort();
    names
}

/// A successful `Browse` response carrying `didl`.
pub fn browse_reply(number_returned: u32, total_matches: u32, didl: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0"?>"#,
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">"#,
            r#"<s:Body><u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1">"#,
            "<Result>{}</Result><NumberReturned>{}</NumberReturned>",
            "<TotalMatches>{}</TotalMatches><UpdateID>1</UpdateID>",
            "</u:BrowseResponse></s:Body></s:Envelope>"
        ),
        quick_xml::escape::escape(didl),
        number_returned,
        total_matches
    )
}

/// An empty `DestroyObject` response.
pub fn destroy_reply() -> String {
    concat!(
        r#"<?xml version="1.0"?>"#,
        r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">"#,
        r#"<s:Body><u:DestroyObjectResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1"/>"#,
        "</s:Body></s:Envelope>"
    )
    .to_string()
}

/// A UPnP error wrapped in a SOAP fault.
pub fn fault_reply(code: &str, description: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0"?>"#,
            r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">"#,
            "<s:Body><s:Fault><faultcode>s:Client</faultcode><faultstring>UPnPError</faultstring>",
            r#"<detail><UPnPError xmlns="urn:schemas-upnp-org:control-1-0">"#,
            "<errorCode>{}</errorCode><errorDescription>{}</errorDescription>",
            "</UPnPError></detail></s:Fault></s:Body></s:Envelope>"
        ),
        code, description
    )
}

/// A MediaServer description whose ContentDirectory points back at `base_url`.
pub fn device_description(friendly_name: &str, base_url: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<root xmlns="urn:schemas-upnp-org:device-1-0">
  <URLBase>{base_url}</URLBase>
  <device>
    <deviceType>urn:schemas-upnp-org:device:MediaServer:1</deviceType>
    <friendlyName>{friendly_name}</friendlyName>
    <manufacturer>Panasonic</manufacturer>
    <modelName>LUMIX</modelName>
    <serviceList>
      <service>
        <serviceType>urn:schemas-upnp-org:service:ContentDirectory:1</serviceType>
        <serviceId>urn:upnp-org:serviceId:ContentDirectory</serviceId>
        <controlURL>/CDS_control</controlURL>
      </service>
    </serviceList>
  </device>
</root>"#
    )
}
