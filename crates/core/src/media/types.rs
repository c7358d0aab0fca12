//! Photo and movie catalog entries.

use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::error::MediaError;

/// Original-quality JPEG, e.g. `/DO1050344.JPG`.
static BEST_JPEG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/do\w+\.jpe?g$").expect("valid best-jpeg pattern"));

static JPEG_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.jpe?g$").expect("valid jpeg suffix pattern"));

/// Camera video file, e.g. `/DO1050345.MP4`.
static VIDEO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)/do\w+\.mp4$").expect("valid video pattern"));

/// Extension the camera uses for RAW files.
pub const RAW_EXTENSION: &str = ".RW2";

/// One downloadable rendition of a catalog object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Representation {
    pub uri: Option<String>,
    pub size_bytes: Option<u64>,
}

impl Representation {
    pub fn new(uri: impl Into<String>, size_bytes: Option<u64>) -> Self {
        Self {
            uri: Some(uri.into()),
            size_bytes,
        }
    }
}

/// A still image held by the camera.
///
/// Cameras list several JPEG renditions but not the RAW file, which is
/// nevertheless served next to the original JPEG. For example a listing of
///
/// ```text
/// http://192.168.0.215:50001/DO1050344.JPG
/// http://192.168.0.215:50001/DT1050344.JPG
/// http://192.168.0.215:50001/DS1050344.JPG
/// ```
///
/// also has `http://192.168.0.215:50001/DO1050344.RW2` available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    object_id: String,
    representations: Vec<Representation>,
}

impl Photo {
    pub fn new(object_id: impl Into<String>, representations: Vec<Representation>) -> Self {
        Self {
            object_id: object_id.into(),
            representations,
        }
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }

    /// URL of the best JPEG rendition.
    ///
    /// The original-quality naming pattern wins regardless of declared size;
    /// otherwise the largest declared representation is used (missing sizes
    /// count as zero, the first one wins on ties).
    pub fn best_image_url(&self) -> Result<&str, MediaError> {
        let usable = || {
            self.representations
                .iter()
                .filter_map(|r| r.uri.as_deref().map(|uri| (uri, r.size_bytes.unwrap_or(0))))
        };

        if let Some((uri, _)) = usable().find(|(uri, _)| BEST_JPEG_RE.is_match(uri)) {
            return Ok(uri);
        }

        let mut largest: Option<(&str, u64)> = None;
        for (uri, size) in usable() {
            match largest {
                Some((_, best)) if best >= size => {}
                _ => largest = Some((uri, size)),
            }
        }

        largest
            .map(|(uri, _)| uri)
            .ok_or_else(|| MediaError::no_representation(&self.object_id, "image"))
    }

    /// Guessed URL of the RAW file. It may not exist on the camera.
    pub fn raw_url(&self) -> Result<String, MediaError> {
        let jpeg = self.best_image_url()?;
        Ok(JPEG_SUFFIX_RE.replace(jpeg, RAW_EXTENSION).into_owned())
    }

    pub fn base_name(&self) -> Result<&str, MediaError> {
        self.best_image_url().map(base_name_from_url)
    }
}

/// A video clip held by the camera.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    object_id: String,
    representations: Vec<Representation>,
}

impl Movie {
    pub fn new(object_id: impl Into<String>, representations: Vec<Representation>) -> Self {
        Self {
            object_id: object_id.into(),
            representations,
        }
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }

    pub fn video_url(&self) -> Result<&str, MediaError> {
        self.representations
            .iter()
            .filter_map(|r| r.uri.as_deref())
            .find(|uri| VIDEO_RE.is_match(uri))
            .ok_or_else(|| MediaError::no_representation(&self.object_id, "video"))
    }

    pub fn base_name(&self) -> Result<&str, MediaError> {
        self.video_url().map(base_name_from_url)
    }
}

/// A catalog entry the pipeline knows how to drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaObject {
    Photo(Photo),
    Movie(Movie),
}

impl MediaObject {
    pub fn object_id(&self) -> &str {
        match self {
            Self::Photo(photo) => photo.object_id(),
            Self::Movie(movie) => movie.object_id(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Photo(_) => "photo",
            Self::Movie(_) => "movie",
        }
    }

    /// Human readable name, falling back to the object id when the entry has
    /// no usable URL.
    pub fn display_name(&self) -> &str {
        let name = match self {
            Self::Photo(photo) => photo.base_name(),
            Self::Movie(movie) => movie.base_name(),
        };
        name.unwrap_or_else(|_| self.object_id())
    }
}

impl fmt::Display for MediaObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Self::Photo(_) => "Photo",
            Self::Movie(_) => "Movie",
        };
        write!(f, "<{}: {}>", kind, self.display_name())
    }
}

/// Last path segment of a URL, e.g. `DO1050344.JPG`.
pub fn file_name_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Last path segment of a URL without its extension, e.g. `DO1050344`.
pub fn base_name_from_url(url: &str) -> &str {
    let file_name = file_name_from_url(url);
    match file_name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => file_name,
    }
}
