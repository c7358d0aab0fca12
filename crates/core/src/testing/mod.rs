//! Testing utilities and mock implementations.
//!
//! Mocks for every collaborator of a camera session, so sessions and the
//! discovery loop can be exercised without a camera on the network.
//!
//! # Example
//!
//! ```rust,ignore
//! use lumixdump_core::testing::{fixtures, MockContentDirectory, RecordingHook};
//!
//! let directory = MockContentDirectory::with_objects(vec![
//!     fixtures::photo_object("http://127.0.0.1:50001", 1050344),
//! ]);
//! let hook = RecordingHook::new();
//!
//! // Run a CameraSession against the directory...
//! assert_eq!(hook.reports().await.len(), 1);
//! ```

mod mock_content_directory;
mod mock_discovery;
mod mock_verifier;
mod recording_hook;

pub use mock_content_directory::{render_didl, CatalogObject, InjectedFailure, MockContentDirectory};
pub use mock_discovery::{MockConnector, MockDiscoverer};
pub use mock_verifier::MockVerifier;
pub use recording_hook::RecordingHook;

/// Test fixtures and helper functions.
pub mod fixtures {
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    use super::CatalogObject;
    use crate::media::Representation;
    use crate::upnp::{Device, Service};

    /// Base URL used for objects that are never actually fetched.
    pub const CAMERA_URL: &str = "http://192.168.54.1:50001";

    /// A photo listed the way Lumix cameras list them: original, thumbnail
    /// and screen-size JPEGs, no RAW.
    pub fn photo_object(base_url: &str, number: u32) -> CatalogObject {
        CatalogObject::photo(
            number.to_string(),
            vec![
                Representation::new(format!("{}/DO{}.JPG", base_url, number), Some(9_000_000)),
                Representation::new(format!("{}/DT{}.JPG", base_url, number), Some(20_000)),
                Representation::new(format!("{}/DS{}.JPG", base_url, number), Some(300_000)),
            ],
        )
    }

    /// A movie with its MP4 and a thumbnail.
    pub fn movie_object(base_url: &str, number: u32) -> CatalogObject {
        CatalogObject::movie(
            number.to_string(),
            vec![
                Representation::new(format!("{}/DT{}.JPG", base_url, number), Some(20_000)),
                Representation::new(format!("{}/DO{}.MP4", base_url, number), Some(50_000_000)),
            ],
        )
    }

    /// An item of a kind the enumerator skips.
    pub fn audio_object(base_url: &str, number: u32) -> CatalogObject {
        CatalogObject::new(
            number.to_string(),
            "object.item.audioItem.musicTrack",
            vec![Representation::new(format!("{}/{}.WAV", base_url, number), None)],
        )
    }

    /// A device that passes the Lumix camera filter.
    pub fn lumix_device(friendly_name: &str, location: &str) -> Device {
        Device {
            location: location.to_string(),
            friendly_name: friendly_name.to_string(),
            manufacturer: "Panasonic".to_string(),
            device_type: "urn:schemas-upnp-org:device:MediaServer:1".to_string(),
            model_name: "LUMIX".to_string(),
            services: vec![Service {
                service_type: "urn:schemas-upnp-org:service:ContentDirectory:1".to_string(),
                service_id: "urn:upnp-org:serviceId:ContentDirectory".to_string(),
                control_url: format!("{}/CDS_control", location.trim_end_matches('/')),
            }],
        }
    }

    /// A small, valid JPEG.
    pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .expect("encoding an in-memory JPEG cannot fail");
        bytes
    }

    /// A minimal MP4 whose top-level boxes are intact.
    pub fn mp4_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        for (kind, payload) in [(b"ftyp", 16usize), (b"moov", 64), (b"mdat", 2048)] {
            bytes.extend_from_slice(&((payload + 8) as u32).to_be_bytes());
            bytes.extend_from_slice(kind);
            bytes.extend(std::iter::repeat(0x42).take(payload));
        }
        bytes
    }
}
