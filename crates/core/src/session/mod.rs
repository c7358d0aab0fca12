//! Camera sessions.
//!
//! A [`CameraSession`] walks a camera's catalog with a [`MediaEnumerator`],
//! downloads and verifies every object, deletes it from the camera, and
//! reports how it ended with a [`SessionReport`].

mod camera;
mod cursor;
mod enumerator;
mod error;
mod types;

pub use camera::CameraSession;
pub use cursor::EnumerationCursor;
pub use enumerator::{MediaEnumerator, PAGE_SIZE};
pub use error::SessionError;
pub use types::{SessionOutcome, SessionReport};
