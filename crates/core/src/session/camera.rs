//! Drains one camera: download, verify, then delete each media object.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::enumerator::MediaEnumerator;
use super::error::SessionError;
use super::types::{SessionOutcome, SessionReport};
use crate::context::ExecutionContext;
use crate::download::{DownloadError, TargetLocations, WhatWasDownloaded};
use crate::media::{MediaObject, Movie, Photo};
use crate::upnp::ContentDirectory;
use crate::verify::Verifier;

/// One pass over a camera's catalog.
pub struct CameraSession<'a> {
    context: &'a ExecutionContext,
    camera_name: String,
    directory: Arc<dyn ContentDirectory>,
}

impl<'a> CameraSession<'a> {
    pub fn new(
        context: &'a ExecutionContext,
        camera_name: impl Into<String>,
        directory: Arc<dyn ContentDirectory>,
    ) -> Self {
        Self {
            context,
            camera_name: camera_name.into(),
            directory,
        }
    }

    /// Runs the session to completion. Errors end the session but never
    /// escape it; the completion hook runs exactly once on every path.
    pub async fn run(self) -> SessionReport {
        let started_at = Utc::now();
        let mut enumerator = MediaEnumerator::new(Arc::clone(&self.directory));
        let mut downloaded = 0u32;
        let mut current: Option<TargetLocations> = None;

        let result = self
            .drain(&mut enumerator, &mut downloaded, &mut current)
            .await;

        let (outcome, error) = match result {
            Ok(()) => {
                info!(camera = %self.camera_name, "Download from {} finished", self.camera_name);
                (SessionOutcome::Finished, None)
            }
            Err(e) => {
                self.report_failure(&e);
                if e.requires_cleanup() {
                    if let Some(targets) = &current {
                        let removed = targets.delete_incomplete().await;
                        if !removed.is_empty() {
                            info!(
                                camera = %self.camera_name,
                                files = removed.len(),
                                "Deleted incomplete files"
                            );
                        }
                    }
                }
                (e.outcome(), Some(e.to_string()))
            }
        };

        let report = SessionReport {
            camera_name: self.camera_name.clone(),
            downloaded,
            total_items: enumerator.total_items_hint(),
            outcome,
            error,
            started_at,
            finished_at: Utc::now(),
        };
        self.context.hook().on_session_finished(&report).await;
        report
    }

    fn report_failure(&self, e: &SessionError) {
        let camera = &self.camera_name;
        match e {
            SessionError::Verification(_) => {
                error!(camera = %camera, error = %e, "Error validating file upon download")
            }
            SessionError::StreamInterrupted(_) => {
                info!(camera = %camera, error = %e, "Media download was interrupted")
            }
            SessionError::ConnectivityLost(_) => {
                warn!(camera = %camera, "Connection to camera lost: {}", e);
                info!(
                    camera = %camera,
                    "Camera may have powered off or gone to sleep. Files downloaded so far have been saved."
                );
            }
            _ => error!(camera = %camera, error = %e, "Camera session failed"),
        }
    }

    async fn drain(
        &self,
        enumerator: &mut MediaEnumerator,
        downloaded: &mut u32,
        current: &mut Option<TargetLocations>,
    ) -> Result<(), SessionError> {
        while let Some(object) = enumerator.next().await? {
            let targets = current.insert(TargetLocations::new(self.context.output_dir()));
            info!(camera = %self.camera_name, item = %object, "Started downloading {}", object);

            let saved = match &object {
                MediaObject::Photo(photo) => self.download_photo(photo, targets).await?,
                MediaObject::Movie(movie) => self.download_movie(movie, targets).await?,
            };

            if !saved {
                info!(camera = %self.camera_name, item = %object, "Could not download {}", object);
                continue;
            }

            self.directory.destroy_object(object.object_id()).await?;
            enumerator.notify_item_deleted();
            *downloaded += 1;
            info!(camera = %self.camera_name, item = %object, "Deleted {} from camera", object);
        }
        Ok(())
    }

    /// Fetches the RAW and JPEG of a photo. A representation the camera
    /// answers with an HTTP error for is simply not there.
    async fn download_photo(
        &self,
        photo: &Photo,
        targets: &mut TargetLocations,
    ) -> Result<bool, SessionError> {
        let wanted = self.context.what_to_download();
        let verifiers = self.context.verifiers();
        let mut what = WhatWasDownloaded::None;

        if wanted.wants_raw() {
            let url = photo.raw_url()?;
            if self.fetch_optional(&url, targets, verifiers.raw.as_ref()).await? {
                what |= WhatWasDownloaded::JustRaw;
                info!(camera = %self.camera_name, "Downloaded RAW: {}", photo.base_name()?);
            }
        }

        if wanted.wants_jpeg() {
            let url = photo.best_image_url()?.to_string();
            if self.fetch_optional(&url, targets, verifiers.image.as_ref()).await? {
                what |= WhatWasDownloaded::JustJpeg;
                info!(camera = %self.camera_name, "Downloaded JPEG: {}", photo.base_name()?);
            }
        }

        debug!(camera = %self.camera_name, saved = %what, "Photo done");
        Ok(what.any())
    }

    async fn fetch_optional(
        &self,
        url: &str,
        targets: &mut TargetLocations,
        verifier: &dyn Verifier,
    ) -> Result<bool, SessionError> {
        match self
            .context
            .downloader()
            .download_and_verify(url, targets, Some(verifier))
            .await
        {
            Ok(_) => Ok(true),
            Err(DownloadError::HttpStatus { status, .. }) => {
                debug!(camera = %self.camera_name, url = %url, status, "Representation not available");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn download_movie(
        &self,
        movie: &Movie,
        targets: &mut TargetLocations,
    ) -> Result<bool, SessionError> {
        let url = movie.video_url()?;
        let verifier = self.context.verifiers().video.as_ref();
        self.context
            .downloader()
            .download_and_verify(url, targets, Some(verifier))
            .await?;
        Ok(true)
    }
}
