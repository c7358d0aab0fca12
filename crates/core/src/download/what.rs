//! What a photo produced, and what the operator wants from each photo.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// Which representations of a photo were downloaded and verified.
///
/// Merging with `|` is commutative and associative. `None` is the identity
/// and two different non-`None` values merge to `Both`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WhatWasDownloaded {
    #[default]
    None,
    JustRaw,
    JustJpeg,
    Both,
}

impl WhatWasDownloaded {
    /// Whether anything was saved, i.e. the remote object may be deleted.
    pub fn any(self) -> bool {
        self != Self::None
    }
}

impl BitOr for WhatWasDownloaded {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        match (self, rhs) {
            (Self::None, other) | (other, Self::None) => other,
            (a, b) if a == b => a,
            _ => Self::Both,
        }
    }
}

impl BitOrAssign for WhatWasDownloaded {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = *self | rhs;
    }
}

impl fmt::Display for WhatWasDownloaded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::None => "nothing",
            Self::JustRaw => "RAW",
            Self::JustJpeg => "JPEG",
            Self::Both => "RAW+JPEG",
        };
        write!(f, "{}", s)
    }
}

/// Which photo representations to attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhatToDownload {
    #[serde(alias = "jpeg")]
    JustJpeg,
    #[serde(alias = "raw")]
    JustRaw,
    #[default]
    Both,
}

impl WhatToDownload {
    pub fn wants_raw(self) -> bool {
        matches!(self, Self::JustRaw | Self::Both)
    }

    pub fn wants_jpeg(self) -> bool {
        matches!(self, Self::JustJpeg | Self::Both)
    }
}

impl FromStr for WhatToDownload {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" | "just_jpeg" => Ok(Self::JustJpeg),
            "raw" | "just_raw" => Ok(Self::JustRaw),
            "both" => Ok(Self::Both),
            other => Err(format!(
                "unknown value '{}', expected one of: jpeg, raw, both",
                other
            )),
        }
    }
}

impl fmt::Display for WhatToDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::JustJpeg => "jpeg",
            Self::JustRaw => "raw",
            Self::Both => "both",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use WhatWasDownloaded::*;

    const ALL: [WhatWasDownloaded; 4] = [None, JustRaw, JustJpeg, Both];

    #[test]
    fn test_merge_table() {
        assert_eq!(None | None, None);
        assert_eq!(None | JustRaw, JustRaw);
        assert_eq!(JustJpeg | None, JustJpeg);
        assert_eq!(JustRaw | JustRaw, JustRaw);
        assert_eq!(JustJpeg | JustJpeg, JustJpeg);
        assert_eq!(JustRaw | JustJpeg, Both);
        assert_eq!(JustJpeg | JustRaw, Both);
        assert_eq!(Both | JustRaw, Both);
        assert_eq!(None | Both, Both);
        assert_eq!(Both | Both, Both);
    }

    #[test]
    fn test_merge_laws() {
        for a in ALL {
            assert_eq!(a | None, a);
            assert_eq!(a | a, a);
            for b in ALL {
                assert_eq!(a | b, b | a);
                for c in ALL {
                    assert_eq!((a | b) | c, a | (b | c));
                }
            }
        }
    }

    #[test]
    fn test_merge_assign() {
        let mut what = None;
        what |= JustRaw;
        assert!(what.any());
        what |= JustJpeg;
        assert_eq!(what, Both);
        assert!(!None.any());
    }

    #[test]
    fn test_what_to_download_parsing() {
        assert_eq!("jpeg".parse::<WhatToDownload>().unwrap(), WhatToDownload::JustJpeg);
        assert_eq!("RAW".parse::<WhatToDownload>().unwrap(), WhatToDownload::JustRaw);
        assert_eq!("both".parse::<WhatToDownload>().unwrap(), WhatToDownload::Both);
        assert!("tiff".parse::<WhatToDownload>().is_err());
    }

    #[test]
    fn test_what_to_download_serde() {
        #[derive(Deserialize)]
        struct Wrapper {
            what: WhatToDownload,
        }

        let w: Wrapper = toml::from_str(r#"what = "just_raw""#).unwrap();
        assert_eq!(w.what, WhatToDownload::JustRaw);
        let w: Wrapper = toml::from_str(r#"what = "jpeg""#).unwrap();
        assert_eq!(w.what, WhatToDownload::JustJpeg);

        assert!(WhatToDownload::Both.wants_raw());
        assert!(WhatToDownload::Both.wants_jpeg());
        assert!(!WhatToDownload::JustJpeg.wants_raw());
        assert!(!WhatToDownload::JustRaw.wants_jpeg());
    }
}
