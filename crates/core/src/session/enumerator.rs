//! Paginated enumeration of a camera's media objects.

use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info};

use super::cursor::EnumerationCursor;
use crate::media::{parse_didl, MediaObject};
use crate::upnp::{BrowseRequest, ContentDirectory, UpnpError};

/// Objects requested per `Browse` call.
pub const PAGE_SIZE: u32 = 10;

/// Yields the photos and movies of a ContentDirectory, page by page.
///
/// The caller reports every deletion of a yielded object with
/// [`notify_item_deleted`](Self::notify_item_deleted) so that no object is
/// skipped when the catalog shifts.
pub struct MediaEnumerator {
    directory: Arc<dyn ContentDirectory>,
    cursor: EnumerationCursor,
    buffered: VecDeque<MediaObject>,
    exhausted: bool,
}

impl MediaEnumerator {
    pub fn new(directory: Arc<dyn ContentDirectory>) -> Self {
        Self {
            directory,
            cursor: EnumerationCursor::new(),
            buffered: VecDeque::new(),
            exhausted: false,
        }
    }

    pub fn cursor(&self) -> &EnumerationCursor {
        &self.cursor
    }

    pub fn total_items_hint(&self) -> Option<u32> {
        self.cursor.total_items_hint()
    }

    pub fn notify_item_deleted(&mut self) {
        self.cursor.record_deleted();
    }

    /// Returns the next photo or movie, or `None` once the catalog is done.
    ///
    /// A SOAP fault ends the sequence. Transport failures are returned.
    pub async fn next(&mut self) -> Result<Option<MediaObject>, UpnpError> {
        loop {
            if let Some(object) = self.buffered.pop_front() {
                return Ok(Some(object));
            }
            if self.exhausted {
                return Ok(None);
            }
            self.fetch_page().await?;
        }
    }

    async fn fetch_page(&mut self) -> Result<(), UpnpError> {
        let request = BrowseRequest::root_children(self.cursor.effective_offset(), PAGE_SIZE);
        debug!(
            starting_index = request.starting_index,
            deleted = self.cursor.deleted_count(),
            "Browsing"
        );

        let response = match self.directory.browse(&request).await {
            Ok(response) => response,
            Err(UpnpError::SoapFault { code, description }) => {
                debug!(code = %code, description = %description, "Browse fault, no more content");
                self.exhausted = true;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        if self.cursor.is_first_page() {
            self.cursor.record_total(response.total_matches);
            info!("Found {} media files in total", response.total_matches);
        }

        if response.number_returned == 0 {
            self.exhausted = true;
            return Ok(());
        }

        for item in parse_didl(&response.result)? {
            let id = item.id.clone();
            let class = item.class.clone();
            match item.into_media_object() {
                Some(object) => self.buffered.push_back(object),
                None => debug!(id = %id, class = %class, "Skipping unsupported item"),
            }
        }
        self.cursor.advance(response.number_returned);
        Ok(())
    }
}
