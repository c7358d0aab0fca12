//! Video verification.
//!
//! Videos are too large for a full decode on every transfer, so the check is
//! structural: the ISO-BMFF boxes must chain exactly to the end of the file
//! and the boxes every playable MP4 needs must be present. When an ffprobe
//! binary is configured the container is also probed for a video stream.

use async_trait::async_trait;
use serde::Deserialize;
use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::process::Command;
use tracing::{debug, warn};

use super::config::VerifierConfig;
use super::error::VerificationError;
use super::traits::Verifier;

const NAME: &str = "video";

/// Upper bound on top-level boxes; real camera files have a handful.
const MAX_TOP_LEVEL_BOXES: usize = 4096;

const REQUIRED_BOXES: [&str; 2] = ["moov", "mdat"];

/// A top-level box found while walking a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopLevelBox {
    pub kind: String,
    pub offset: u64,
    pub size: u64,
}

/// Top-level box layout of an MP4 file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxLayout {
    pub file_len: u64,
    pub boxes: Vec<TopLevelBox>,
}

impl BoxLayout {
    pub fn contains(&self, kind: &str) -> bool {
        self.boxes.iter().any(|b| b.kind == kind)
    }
}

/// Walks the top-level boxes of an MP4 file.
///
/// Fails when a box header is cut short, a box claims more bytes than the
/// file holds, the first box is not `ftyp`, or `moov`/`mdat` is missing.
pub async fn check_box_structure(path: &Path) -> Result<BoxLayout, String> {
    let mut file = File::open(path)
        .await
        .map_err(|e| format!("cannot open file: {}", e))?;
    let file_len = file
        .metadata()
        .await
        .map_err(|e| format!("cannot stat file: {}", e))?
        .len();

    let mut boxes = Vec::new();
    let mut offset = 0u64;

    while offset < file_len {
        if boxes.len() >= MAX_TOP_LEVEL_BOXES {
            return Err(format!("more than {} top-level boxes", MAX_TOP_LEVEL_BOXES));
        }

        file.seek(SeekFrom::Start(offset))
            .await
            .map_err(|e| format!("seek to {} failed: {}", offset, e))?;

        let mut header = [0u8; 8];
        file.read_exact(&mut header)
            .await
            .map_err(|_| format!("truncated box header at offset {}", offset))?;

        let size32 = u32::from_be_bytes([header[0], header[1], header[2], header[3]]);
        let kind = String::from_utf8_lossy(&header[4..8]).to_string();

        let size = match size32 {
            0 => file_len - offset,
            1 => {
                let mut large = [0u8; 8];
                file.read_exact(&mut large)
                    .await
                    .map_err(|_| format!("truncated 64-bit size of '{}' at offset {}", kind, offset))?;
                let size = u64::from_be_bytes(large);
                if size < 16 {
                    return Err(format!("box '{}' at offset {} has invalid size {}", kind, offset, size));
                }
                size
            }
            n if n < 8 => {
                return Err(format!("box '{}' at offset {} has invalid size {}", kind, offset, n));
            }
            n => n as u64,
        };

        let remaining = file_len - offset;
        if size > remaining {
            return Err(format!(
                "box '{}' at offset {} declares {} bytes but only {} remain",
                kind, offset, size, remaining
            ));
        }

        boxes.push(TopLevelBox { kind, offset, size });
        offset += size;
    }

    let layout = BoxLayout { file_len, boxes };

    match layout.boxes.first() {
        Some(first) if first.kind == "ftyp" => {}
        Some(first) => return Err(format!("file starts with '{}' instead of 'ftyp'", first.kind)),
        None => return Err("file is empty".to_string()),
    }
    for required in REQUIRED_BOXES {
        if !layout.contains(required) {
            return Err(format!("missing '{}' box", required));
        }
    }

    Ok(layout)
}

/// Verifies video files with a box walk and an optional ffprobe probe.
#[derive(Debug)]
pub struct VideoVerifier {
    ffprobe_path: Option<PathBuf>,
    ffprobe_missing_reported: AtomicBool,
}

impl VideoVerifier {
    pub fn new(config: &VerifierConfig) -> Self {
        Self {
            ffprobe_path: config.ffprobe_path.clone(),
            ffprobe_missing_reported: AtomicBool::new(false),
        }
    }

    /// Only runs the built-in structure check.
    pub fn structure_only() -> Self {
        Self::new(&VerifierConfig::default().with_ffprobe_path(None))
    }

    async fn probe(&self, ffprobe: &Path, path: &Path) -> Result<(), String> {
        let output = Command::new(ffprobe)
            .args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
            ])
            .arg(path)
            .output()
            .await;

        let output = match output {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if !self.ffprobe_missing_reported.swap(true, Ordering::Relaxed) {
                    warn!(
                        "ffprobe not found at {}, videos are only checked structurally",
                        ffprobe.display()
                    );
                }
                return Ok(());
            }
            Err(e) => return Err(format!("failed to run ffprobe: {}", e)),
        };

        if !output.status.success() {
            return Err(format!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ));
        }

        check_probe_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Checks ffprobe JSON output for a readable container with a video stream.
fn check_probe_output(output: &str) -> Result<(), String> {
    #[derive(Deserialize)]
    struct ProbeOutput {
        format: Option<ProbeFormat>,
        #[serde(default)]
        streams: Vec<ProbeStream>,
    }

    #[derive(Deserialize)]
    struct ProbeFormat {
        format_name: String,
        duration: Option<String>,
    }

    #[derive(Deserialize)]
    struct ProbeStream {
        codec_type: String,
    }

    let probe: ProbeOutput = serde_json::from_str(output)
        .map_err(|e| format!("failed to parse ffprobe output: {}", e))?;

    let format = probe
        .format
        .ok_or_else(|| "ffprobe reported no container format".to_string())?;

    if !probe.streams.iter().any(|s| s.codec_type == "video") {
        return Err(format!("no video stream in {} container", format.format_name));
    }

    let duration = format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);
    if duration <= 0.0 {
        return Err("container reports no duration".to_string());
    }

    Ok(())
}

#[async_trait]
impl Verifier for VideoVerifier {
    fn name(&self) -> &str {
        NAME
    }

    async fn verify(&self, path: &Path) -> Result<(), VerificationError> {
        let layout = check_box_structure(path)
            .await
            .map_err(|reason| VerificationError::new(NAME, path, reason))?;
        debug!(
            file = %path.display(),
            boxes = layout.boxes.len(),
            bytes = layout.file_len,
            "MP4 structure intact"
        );

        if let Some(ffprobe) = &self.ffprobe_path {
            self.probe(ffprobe, path)
                .await
                .map_err(|reason| VerificationError::new(NAME, path, reason))?;
        }
        Ok(())
    }
}
