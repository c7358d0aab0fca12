//! Discovery loop: find Lumix cameras on the network and drain each one.

mod cameras;
mod config;
mod runner;

pub use cameras::{is_lumix_camera, CameraList};
pub use config::DiscoveryConfig;
pub use runner::DiscoveryLoop;
