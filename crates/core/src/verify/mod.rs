//! Format-specific integrity checks for downloaded media.
//!
//! Every file fetched from a camera is verified before the camera is told to
//! delete its copy. Each media kind has its own [`Verifier`]:
//!
//! - [`ImageVerifier`]: full JPEG decode
//! - [`RawVerifier`]: RAW decode plus a develop pass over the sensor data
//! - [`VideoVerifier`]: MP4 box structure walk, optionally followed by an
//!   `ffprobe` container probe
//!
//! All of them report failures as a [`VerificationError`].

mod config;
mod error;
mod jpeg;
mod raw;
mod set;
mod traits;
mod video;

pub use config::VerifierConfig;
pub use error::VerificationError;
pub use jpeg::ImageVerifier;
pub use raw::RawVerifier;
pub use set::VerifierSet;
pub use traits::Verifier;
pub use video::{check_box_structure, BoxLayout, TopLevelBox, VideoVerifier};
