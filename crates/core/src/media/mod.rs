//! Media catalog model.
//!
//! Value types for the photo and movie objects a camera exposes through its
//! ContentDirectory, together with the rules that pick which of an object's
//! representations gets downloaded:
//!
//! - Photos prefer the original-quality JPEG (`DO*.JPG`), falling back to the
//!   largest declared representation.
//! - The RAW file of a photo is never listed; its URL is derived from the
//!   JPEG one by swapping the extension for `.RW2`.
//! - Movies use the first `DO*.MP4` representation.
//!
//! The [`didl`] submodule decodes the DIDL-Lite documents returned by
//! `Browse` into these types.

pub mod didl;
mod error;
mod types;

pub use didl::{parse_didl, parse_media_objects, DidlItem, ItemKind};
pub use error::MediaError;
pub use types::{
    base_name_from_url, file_name_from_url, MediaObject, Movie, Photo, Representation,
    RAW_EXTENSION,
};
