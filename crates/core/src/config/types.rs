use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::discovery::DiscoveryConfig;
use crate::download::{DownloaderConfig, WhatToDownload};
use crate::verify::VerifierConfig;

/// Root configuration. Top-level keys also accept the dashed spelling of
/// the matching command line flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Directory where the media is saved.
    #[serde(default, alias = "output-dir")]
    pub output_dir: PathBuf,
    /// Shell command run after every camera session.
    #[serde(default, alias = "command-after-finish")]
    pub command_after_finish: Option<String>,
    #[serde(default, alias = "what-to-download")]
    pub what_to_download: WhatToDownload,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub downloader: DownloaderConfig,
    #[serde(default)]
    pub verifier: VerifierConfig,
}

/// Values given on the command line. They win over file and environment.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command_after_finish: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_to_download: Option<WhatToDownload>,
}
