//! Verified downloads.
//!
//! A file is streamed to a staging directory, checked by a
//! [`Verifier`](crate::verify::Verifier), and only then copied to the output
//! directory. [`TargetLocations`] records which outputs of the current media
//! object are complete so partial files can be cleaned up after a failure.

mod config;
mod downloader;
mod error;
mod targets;
mod what;

pub use config::DownloaderConfig;
pub use downloader::{DownloadedFile, Downloader};
pub use error::DownloadError;
pub use targets::TargetLocations;
pub use what::{WhatToDownload, WhatWasDownloaded};
