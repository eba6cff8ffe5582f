//! Archive container format selection.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported archive container formats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveFormat {
    /// ZIP container with deflate-compressed entries.
    Zip,
    /// Uncompressed tar container.
    Tar,
}

impl ArchiveFormat {
    /// File extension used for archives in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar => "tar",
        }
    }

    /// MIME type served when downloading an archive in this format.
    pub fn content_type(self) -> &'static str {
        match self {
            Self::Zip => "application/zip",
            Self::Tar => "application/x-tar",
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for ArchiveFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zip" => Ok(Self::Zip),
            "tar" => Ok(Self::Tar),
            _ => Err(Error::UnsupportedFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_formats() {
        assert_eq!("zip".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zip);
        assert_eq!("tar".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Tar);
        // Case insensitive
        assert_eq!("ZIP".parse::<ArchiveFormat>().unwrap(), ArchiveFormat::Zip);
    }

    #[test]
    fn parse_rejects_other_formats() {
        assert!("rar".parse::<ArchiveFormat>().is_err());
        assert!("tar.gz".parse::<ArchiveFormat>().is_err());
        assert!("".parse::<ArchiveFormat>().is_err());
    }

    #[test]
    fn display_matches_extension() {
        for format in [ArchiveFormat::Zip, ArchiveFormat::Tar] {
            assert_eq!(format.to_string(), format.extension());
            let parsed: ArchiveFormat = format.extension().parse().unwrap();
            assert_eq!(parsed, format);
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_string(&ArchiveFormat::Zip).unwrap(),
            "\"zip\""
        );
        let decoded: ArchiveFormat = serde_json::from_str("\"tar\"").unwrap();
        assert_eq!(decoded, ArchiveFormat::Tar);
    }
}
