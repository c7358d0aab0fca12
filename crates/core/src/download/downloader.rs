//! Streaming download with verification before commit.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::config::DownloaderConfig;
use super::error::DownloadError;
use super::targets::TargetLocations;
use crate::media::file_name_from_url;
use crate::verify::Verifier;

/// A file that was downloaded, verified and committed to its final path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedFile {
    pub file_name: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// SHA-256 of the content, when copy checksums are enabled.
    pub sha256: Option<String>,
}

/// Downloads files over HTTP and only commits verified content.
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
    config: DownloaderConfig,
}

impl Downloader {
    pub fn new(mut config: DownloaderConfig) -> Result<Self, reqwest::Error> {
        config.buffer_size = config.buffer_size.max(1);
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// Downloads `url` into `targets`, verifying it with `verifier` first.
    ///
    /// The output name is the last path segment of the URL. On success the
    /// entry is marked completed. On any error the temp file is removed and
    /// the entry stays pending.
    pub async fn download_and_verify(
        &self,
        url: &str,
        targets: &mut TargetLocations,
        verifier: Option<&dyn Verifier>,
    ) -> Result<DownloadedFile, DownloadError> {
        let file_name = file_name_from_url(url);
        if file_name.is_empty() {
            return Err(DownloadError::InvalidUrl {
                url: url.to_string(),
                reason: "no file name in path".to_string(),
            });
        }
        let target_path = targets.register(file_name);

        debug!(url = %url, "Requesting file");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::connection(url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        fs::create_dir_all(&self.config.temp_dir)
            .await
            .map_err(|e| DownloadError::io(&self.config.temp_dir, e))?;
        let temp_path = self.config.temp_dir.join(format!(
            "lumix_temp_{}_{}",
            Uuid::new_v4().simple(),
            file_name
        ));

        let result = self
            .stage_and_commit(url, response, &temp_path, &target_path, file_name, verifier)
            .await;

        if let Err(e) = fs::remove_file(&temp_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %temp_path.display(), error = %e, "Failed to remove temp file");
            }
        }

        let downloaded = result?;
        targets.mark_completed(file_name);
        info!(
            file = %file_name,
            bytes = downloaded.size_bytes,
            "Downloaded and verified"
        );
        Ok(downloaded)
    }

    async fn stage_and_commit(
        &self,
        url: &str,
        response: reqwest::Response,
        temp_path: &Path,
        target_path: &Path,
        file_name: &str,
        verifier: Option<&dyn Verifier>,
    ) -> Result<DownloadedFile, DownloadError> {
        let (size_bytes, expected) = self.stream_to_file(url, response, temp_path).await?;

        if let Some(verifier) = verifier {
            verifier
                .verify(temp_path)
                .await
                .map_err(|e| e.with_file_name(file_name))?;
            debug!(file = %file_name, verifier = verifier.name(), "Verification passed");
        }

        self.copy_file(temp_path, target_path).await?;

        if let Some(expected) = &expected {
            let actual = self.calculate_checksum(target_path).await?;
            if &actual != expected {
                return Err(DownloadError::ChecksumMismatch {
                    path: target_path.to_path_buf(),
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        Ok(DownloadedFile {
            file_name: file_name.to_string(),
            path: target_path.to_path_buf(),
            size_bytes,
            sha256: expected,
        })
    }

    /// Streams the response body to `path`, hashing it when enabled.
    async fn stream_to_file(
        &self,
        url: &str,
        mut response: reqwest::Response,
        path: &Path,
    ) -> Result<(u64, Option<String>), DownloadError> {
        let advertised = response.content_length();
        let file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, file);
        let mut hasher = self.config.verify_copy_checksum.then(Sha256::new);
        let mut total_bytes = 0u64;

        loop {
            let chunk = match response.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => return Err(DownloadError::interrupted(url, e.to_string())),
            };
            if let Some(ref mut h) = hasher {
                h.update(&chunk);
            }
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| DownloadError::io(path, e))?;
            total_bytes += chunk.len() as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        if let Some(expected) = advertised {
            if total_bytes != expected {
                return Err(DownloadError::interrupted(
                    url,
                    format!("received {} of {} bytes", total_bytes, expected),
                ));
            }
        }

        Ok((total_bytes, hasher.map(|h| format!("{:x}", h.finalize()))))
    }

    /// Copies file contents only; permissions are left to the destination.
    async fn copy_file(&self, source: &Path, destination: &Path) -> Result<u64, DownloadError> {
        let source_file = File::open(source)
            .await
            .map_err(|e| DownloadError::io(source, e))?;
        let dest_file = File::create(destination)
            .await
            .map_err(|e| DownloadError::io(destination, e))?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut total_bytes = 0u64;

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .await
                .map_err(|e| DownloadError::io(source, e))?;
            if bytes_read == 0 {
                break;
            }
            writer
                .write_all(&buffer[..bytes_read])
                .await
                .map_err(|e| DownloadError::io(destination, e))?;
            total_bytes += bytes_read as u64;
        }

        writer
            .flush()
            .await
            .map_err(|e| DownloadError::io(destination, e))?;
        Ok(total_bytes)
    }

    async fn calculate_checksum(&self, path: &Path) -> Result<String, DownloadError> {
        let file = File::open(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = reader
                .read(&mut buffer)
                .await
                .map_err(|e| DownloadError::io(path, e))?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }
        Ok(format!("{:x}", hasher.finalize()))
    }
}
