//! Drains Lumix cameras over UPnP: every photo and video is downloaded,
//! verified, and only then deleted from the camera.

pub mod config;
pub mod context;
pub mod discovery;
pub mod download;
pub mod hook;
pub mod media;
pub mod session;
pub mod testing;
pub mod upnp;
pub mod verify;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, ConfigOverrides,
};
pub use context::ExecutionContext;
pub use discovery::{is_lumix_camera, CameraList, DiscoveryConfig, DiscoveryLoop};
pub use download::{
    DownloadError, DownloadedFile, Downloader, DownloaderConfig, TargetLocations,
    WhatToDownload, WhatWasDownloaded,
};
pub use hook::{CommandHook, NoopHook, SessionHook};
pub use media::{MediaError, MediaObject, Movie, Photo, Representation};
pub use session::{
    CameraSession, EnumerationCursor, MediaEnumerator, SessionError, SessionOutcome,
    SessionReport,
};
pub use upnp::{
    ContentDirectory, ContentDirectoryConnector, Device, DeviceDiscoverer, SoapConnector,
    SoapContentDirectory, SsdpDiscoverer, UpnpError,
};
pub use verify::{
    ImageVerifier, RawVerifier, VerificationError, Verifier, VerifierConfig, VerifierSet,
    VideoVerifier,
};
