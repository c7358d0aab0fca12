//! Mock ContentDirectory backed by an in-memory catalog.

use async_trait::async_trait;
use quick_xml::escape::escape;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::media::Representation;
use crate::upnp::{BrowseRequest, BrowseResponse, ContentDirectory, UpnpError};

const PHOTO_CLASS: &str = "object.item.imageItem.photo";
const MOVIE_CLASS: &str = "object.item.videoItem.movie";

/// An object in the mock catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogObject {
    pub id: String,
    pub class: String,
    pub resources: Vec<Representation>,
}

impl CatalogObject {
    pub fn new(
        id: impl Into<String>,
        class: impl Into<String>,
        resources: Vec<Representation>,
    ) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
            resources,
        }
    }

    pub fn photo(id: impl Into<String>, resources: Vec<Representation>) -> Self {
        Self::new(id, PHOTO_CLASS, resources)
    }

    pub fn movie(id: impl Into<String>, resources: Vec<Representation>) -> Self {
        Self::new(id, MOVIE_CLASS, resources)
    }

    fn to_didl(&self) -> String {
        let mut out = format!(
            r#"<item id="{}" parentID="0" restricted="1"><dc:title>{}</dc:title><upnp:class>{}</upnp:class>"#,
            escape(self.id.as_str()),
            escape(self.id.as_str()),
            escape(self.class.as_str())
        );
        for res in &self.resources {
            let size = res
                .size_bytes
                .map(|s| format!(r#" size="{}""#, s))
                .unwrap_or_default();
            match &res.uri {
                Some(uri) => out.push_str(&format!(
                    r#"<res protocolInfo="http-get:*:*:*"{}>{}</res>"#,
                    size,
                    escape(uri.as_str())
                )),
                None => out.push_str(&format!(r#"<res protocolInfo="http-get:*:*:*"{}/>"#, size)),
            }
        }
        out.push_str("</item>");
        out
    }
}

/// Renders objects as a DIDL-Lite document.
pub fn render_didl(objects: &[CatalogObject]) -> String {
    let mut out = String::from(concat!(
        r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/""#,
        r#" xmlns:dc="http://purl.org/dc/elements/1.1/""#,
        r#" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/">"#
    ));
    for object in objects {
        out.push_str(&object.to_didl());
    }
    out.push_str("</DIDL-Lite>");
    out
}

/// A failure the mock should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InjectedFailure {
    SoapFault { code: String, description: String },
    Connection,
    HttpStatus(u16),
}

impl InjectedFailure {
    /// The fault cameras send when browsing past their content.
    pub fn soap_fault() -> Self {
        Self::SoapFault {
            code: "720".to_string(),
            description: "Cannot process the request".to_string(),
        }
    }

    fn to_error(&self) -> UpnpError {
        match self {
            Self::SoapFault { code, description } => UpnpError::SoapFault {
                code: code.clone(),
                description: description.clone(),
            },
            Self::Connection => UpnpError::connection("mock://camera", "connection reset"),
            Self::HttpStatus(status) => UpnpError::HttpStatus {
                url: "mock://camera".to_string(),
                status: *status,
            },
        }
    }
}

/// Mock implementation of the ContentDirectory trait.
///
/// Holds a real catalog: `Browse` pages over the objects still present and
/// `DestroyObject` removes them, so index shifts after deletions behave as on
/// a camera.
///
/// # Example
///
/// ```rust,ignore
/// let directory = MockContentDirectory::with_objects(vec![fixtures::photo_object(url, 1)]);
/// let session = CameraSession::new(&context, "G9", Arc::new(directory.clone()));
/// session.run().await;
/// assert_eq!(directory.destroyed_objects().await, vec!["1"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockContentDirectory {
    objects: Arc<RwLock<Vec<CatalogObject>>>,
    browse_requests: Arc<RwLock<Vec<BrowseRequest>>>,
    destroyed: Arc<RwLock<Vec<String>>>,
    /// Fail every browse after this many successful ones.
    browse_failure: Arc<RwLock<Option<(usize, InjectedFailure)>>>,
    destroy_failure: Arc<RwLock<Option<InjectedFailure>>>,
}

impl MockContentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_objects(objects: Vec<CatalogObject>) -> Self {
        Self {
            objects: Arc::new(RwLock::new(objects)),
            ..Self::default()
        }
    }

    pub async fn add_object(&self, object: CatalogObject) {
        self.objects.write().await.push(object);
    }

    /// Number of objects still on the "camera".
    pub async fn remaining(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn object_ids(&self) -> Vec<String> {
        self.objects.read().await.iter().map(|o| o.id.clone()).collect()
    }

    pub async fn browse_requests(&self) -> Vec<BrowseRequest> {
        self.browse_requests.read().await.clone()
    }

    pub async fn destroyed_objects(&self) -> Vec<String> {
        self.destroyed.read().await.clone()
    }

    /// Makes every browse after `after_calls` successful ones fail.
    pub async fn fail_browse(&self, failure: InjectedFailure, after_calls: usize) {
        *self.browse_failure.write().await = Some((after_calls, failure));
    }

    pub async fn fail_destroy(&self, failure: InjectedFailure) {
        *self.destroy_failure.write().await = Some(failure);
    }
}

#[async_trait]
impl ContentDirectory for MockContentDirectory {
    async fn browse(&self, request: &BrowseRequest) -> Result<BrowseResponse, UpnpError> {
        let previous_calls = {
            let mut requests = self.browse_requests.write().await;
            requests.push(request.clone());
            requests.len() - 1
        };

        if let Some((after, failure)) = self.browse_failure.read().await.as_ref() {
            if previous_calls >= *after {
                return Err(failure.to_error());
            }
        }

        let objects = self.objects.read().await;
        let start = (request.starting_index as usize).min(objects.len());
        let end = start
            .saturating_add(request.requested_count as usize)
            .min(objects.len());
        let page = &objects[start..end];

        Ok(BrowseResponse {
            number_returned: page.len() as u32,
            total_matches: objects.len() as u32,
            result: render_didl(page),
        })
    }

    async fn destroy_object(&self, object_id: &str) -> Result<(), UpnpError> {
        if let Some(failure) = self.destroy_failure.read().await.as_ref() {
            return Err(failure.to_error());
        }

        let mut objects = self.objects.write().await;
        let Some(index) = objects.iter().position(|o| o.id == object_id) else {
            return Err(UpnpError::SoapFault {
                code: "701".to_string(),
                description: "No such object".to_string(),
            });
        };
        objects.remove(index);
        self.destroyed.write().await.push(object_id.to_string());
        Ok(())
    }
}
