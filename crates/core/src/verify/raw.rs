//! RAW file verification.

use async_trait::async_trait;
use rawloader::{RawImage, RawImageData, CFA};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::VerificationError;
use super::traits::Verifier;

const NAME: &str = "raw";

/// Summary of a develop pass, used for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DevelopStats {
    pub width: usize,
    pub height: usize,
    pub developed_pixels: usize,
    pub mean_luma: f32,
}

/// Verifies RAW files by decoding the sensor data and developing it.
///
/// Decoding alone only reads the container; the develop pass touches every
/// sensor sample so corrupt or short sensor data is caught as well.
#[derive(Debug, Clone, Default)]
pub struct RawVerifier;

impl RawVerifier {
    pub fn new() -> Self {
        Self
    }

    fn decode_and_develop(path: &Path) -> Result<DevelopStats, String> {
        let raw = rawloader::decode_file(path).map_err(|e| format!("decode failed: {:?}", e))?;
        develop(&raw)
    }
}

#[async_trait]
impl Verifier for RawVerifier {
    fn name(&self) -> &str {
        NAME
    }

    async fn verify(&self, path: &Path) -> Result<(), VerificationError> {
        let owned: PathBuf = path.to_path_buf();
        // rawloader panics on some malformed inputs; the join error carries it.
        let stats = tokio::task::spawn_blocking(move || Self::decode_and_develop(&owned))
            .await
            .map_err(|e| VerificationError::new(NAME, path, format!("decoder crashed: {}", e)))?
            .map_err(|reason| VerificationError::new(NAME, path, reason))?;

        debug!(
            file = %path.display(),
            width = stats.width,
            height = stats.height,
            pixels = stats.developed_pixels,
            mean_luma = stats.mean_luma,
            "RAW developed"
        );
        Ok(())
    }
}

/// The parts of a decoded RAW the develop pass reads.
pub(crate) struct SensorFrame<'a> {
    pub width: usize,
    pub height: usize,
    pub cpp: usize,
    pub blacklevels: [u16; 4],
    pub whitelevels: [u16; 4],
    pub cfa: &'a CFA,
    pub data: &'a RawImageData,
}

impl<'a> SensorFrame<'a> {
    fn from_raw(raw: &'a RawImage) -> Self {
        Self {
            width: raw.width,
            height: raw.height,
            cpp: raw.cpp,
            blacklevels: raw.blacklevels,
            whitelevels: raw.whitelevels,
            cfa: &raw.cfa,
            data: &raw.data,
        }
    }
}

pub(crate) fn develop(raw: &RawImage) -> Result<DevelopStats, String> {
    develop_frame(&SensorFrame::from_raw(raw))
}

/// Normalises every sensor sample against the black/white levels and
/// demosaics 2x2 CFA blocks into RGB. A frame where every sample sits at
/// the black level carries no image and is rejected.
pub(crate) fn develop_frame(frame: &SensorFrame<'_>) -> Result<DevelopStats, String> {
    let (width, height, cpp) = (frame.width, frame.height, frame.cpp);
    if width == 0 || height == 0 || cpp == 0 {
        return Err(format!(
            "invalid sensor geometry {}x{} with {} components",
            width, height, cpp
        ));
    }

    let expected = width * height * cpp;
    let available = match frame.data {
        RawImageData::Integer(values) => values.len(),
        RawImageData::Float(values) => values.len(),
    };
    if available < expected {
        return Err(format!(
            "sensor data truncated: {} of {} samples",
            available, expected
        ));
    }

    let sample = |row: usize, col: usize, component: usize| -> f32 {
        let idx = (row * width + col) * cpp + component;
        let color = if cpp == 1 {
            frame.cfa.color_at(row, col).min(3)
        } else {
            component.min(3)
        };
        match frame.data {
            RawImageData::Integer(values) => {
                let black = frame.blacklevels[color] as f32;
                let white = (frame.whitelevels[color] as f32).max(black + 1.0);
                ((values[idx] as f32 - black) / (white - black)).clamp(0.0, 1.0)
            }
            RawImageData::Float(values) => values[idx],
        }
    };

    let mut developed_pixels = 0usize;
    let mut luma_sum = 0f64;
    let mut peak = 0f32;

    if cpp == 1 {
        for row in (0..height.saturating_sub(1)).step_by(2) {
            for col in (0..width.saturating_sub(1)).step_by(2) {
                let mut rgb = [0f32; 3];
                let mut counts = [0u32; 3];
                for (dr, dc) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
                    let (r, c) = (row + dr, col + dc);
                    let channel = match frame.cfa.color_at(r, c) {
                        0 => 0,
                        2 => 2,
                        _ => 1,
                    };
                    rgb[channel] += sample(r, c, 0);
                    counts[channel] += 1;
                }
                let pixel = average(rgb, counts);
                check_pixel(pixel, row, col)?;
                peak = pixel.iter().fold(peak, |m, v| m.max(*v));
                luma_sum += luma(pixel) as f64;
                developed_pixels += 1;
            }
        }
    } else {
        for row in 0..height {
            for col in 0..width {
                let pixel = [
                    sample(row, col, 0),
                    sample(row, col, 1usize.min(cpp - 1)),
                    sample(row, col, 2usize.min(cpp - 1)),
                ];
                check_pixel(pixel, row, col)?;
                peak = pixel.iter().fold(peak, |m, v| m.max(*v));
                luma_sum += luma(pixel) as f64;
                developed_pixels += 1;
            }
        }
    }

    if developed_pixels == 0 {
        return Err("sensor too small to develop".to_string());
    }
    if peak <= 0.0 {
        return Err("every sensor sample is at the black level".to_string());
    }

    Ok(DevelopStats {
        width,
        height,
        developed_pixels,
        mean_luma: (luma_sum / developed_pixels as f64) as f32,
    })
}

fn average(sum: [f32; 3], counts: [u32; 3]) -> [f32; 3] {
    let mut out = [0f32; 3];
    for i in 0..3 {
        if counts[i] > 0 {
            out[i] = sum[i] / counts[i] as f32;
        }
    }
    out
}

fn luma(rgb: [f32; 3]) -> f32 {
    0.2126 * rgb[0] + 0.7152 * rgb[1] + 0.0722 * rgb[2]
}

fn check_pixel(rgb: [f32; 3], row: usize, col: usize) -> Result<(), String> {
    if rgb.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(format!("non-finite sample near row {} col {}", row, col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_luma_weights() {
        assert!((luma([1.0, 1.0, 1.0]) - 1.0).abs() < 1e-5);
        assert_eq!(luma([0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_average_skips_missing_channels() {
        assert_eq!(average([2.0, 3.0, 0.0], [2, 1, 0]), [1.0, 3.0, 0.0]);
    }

    #[test]
    fn test_check_pixel_rejects_nan() {
        assert!(check_pixel([0.1, 0.2, 0.3], 0, 0).is_ok());
        assert!(check_pixel([f32::NAN, 0.2, 0.3], 4, 8)
            .unwrap_err()
            .contains("row 4 col 8"));
    }

    /// A 4x4 RGGB frame with 12-bit levels.
    fn rggb_frame<'a>(cfa: &'a CFA, data: &'a RawImageData) -> SensorFrame<'a> {
        SensorFrame {
            width: 4,
            height: 4,
            cpp: 1,
            blacklevels: [128; 4],
            whitelevels: [4095; 4],
            cfa,
            data,
        }
    }

    #[test]
    fn test_develop_accepts_exposed_bayer_frame() {
        let cfa = CFA::new("RGGB");
        let samples: Vec<u16> = (0..16).map(|i| 600 + i * 150).collect();
        let data = RawImageData::Integer(samples);

        let stats = develop_frame(&rggb_frame(&cfa, &data)).unwrap();
        assert_eq!(stats.width, 4);
        assert_eq!(stats.height, 4);
        assert_eq!(stats.developed_pixels, 4);
        assert!(stats.mean_luma > 0.0 && stats.mean_luma < 1.0);
    }

    #[test]
    fn test_develop_accepts_rgb_frame() {
        let cfa = CFA::new("RGGB");
        let data = RawImageData::Float(vec![0.25; 2 * 2 * 3]);
        let frame = SensorFrame {
            width: 2,
            height: 2,
            cpp: 3,
            blacklevels: [0; 4],
            whitelevels: [1; 4],
            cfa: &cfa,
            data: &data,
        };

        let stats = develop_frame(&frame).unwrap();
        assert_eq!(stats.developed_pixels, 4);
        assert!((stats.mean_luma - 0.25).abs() < 1e-5);
    }

    #[test]
    fn test_develop_rejects_frame_at_black_level() {
        let cfa = CFA::new("RGGB");
        let data = RawImageData::Integer(vec![128; 16]);

        let err = develop_frame(&rggb_frame(&cfa, &data)).unwrap_err();
        assert!(err.contains("black level"), "{}", err);
    }

    #[test]
    fn test_develop_rejects_short_sensor_data() {
        let cfa = CFA::new("RGGB");
        let data = RawImageData::Integer(vec![900; 15]);

        let err = develop_frame(&rggb_frame(&cfa, &data)).unwrap_err();
        assert!(err.contains("15 of 16"), "{}", err);

        let empty = RawImageData::Integer(Vec::new());
        assert!(develop_frame(&rggb_frame(&cfa, &empty)).is_err());
    }

    #[test]
    fn test_develop_rejects_degenerate_geometry() {
        let cfa = CFA::new("RGGB");
        let data = RawImageData::Integer(vec![900; 4]);
        let single_column = SensorFrame {
            width: 1,
            height: 4,
            ..rggb_frame(&cfa, &data)
        };
        assert!(develop_frame(&single_column)
            .unwrap_err()
            .contains("too small"));

        let no_rows = SensorFrame {
            height: 0,
            ..rggb_frame(&cfa, &data)
        };
        assert!(develop_frame(&no_rows)
            .unwrap_err()
            .contains("geometry"));
    }

    #[tokio::test]
    async fn test_non_raw_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("DO0001.RW2");
        tokio::fs::write(&path, vec![0u8; 4096]).await.unwrap();

        let err = RawVerifier::new().verify(&path).await.unwrap_err();
        assert_eq!(err.verifier, "raw");
        assert_eq!(err.file_name, "DO0001.RW2");
    }

    #[tokio::test]
    async fn test_empty_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("DO0002.RW2");
        tokio::fs::write(&path, b"").await.unwrap();

        assert!(RawVerifier::new().verify(&path).await.is_err());
    }
}
