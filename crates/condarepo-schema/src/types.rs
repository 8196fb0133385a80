//! Archive container formats.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Container format of a cached package archive.
///
/// The format decides how the package index is read out of the archive,
/// which suffix the canonical filename carries, and which suffix is
/// stripped to find the unpacked sibling directory.
///
/// # Example
///
/// ```
/// use condarepo_schema::ArchiveFormat;
/// use std::path::Path;
///
/// let format = ArchiveFormat::detect(Path::new("pkgs/zlib-1.3-h4ab18f5_1.tar.bz2"));
/// assert_eq!(format, Some(ArchiveFormat::TarBz2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveFormat {
    /// Bzip2-compressed tar archive (`.tar.bz2`), the legacy conda format.
    TarBz2,
    /// Zip archive (`.conda`) whose `info-*.tar.zst` member holds `info/`.
    Conda,
}

impl ArchiveFormat {
    /// Every supported format, in detection order.
    pub const ALL: [Self; 2] = [Self::TarBz2, Self::Conda];

    /// Filename suffix, including the leading dot.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::TarBz2 => ".tar.bz2",
            Self::Conda => ".conda",
        }
    }

    /// Short name used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TarBz2 => "tar-bz2",
            Self::Conda => "conda",
        }
    }

    /// Detect the format from a file name.
    ///
    /// Matching is case-sensitive, like the package manager's own naming.
    /// A bare suffix with nothing in front of it is not an archive.
    pub fn detect(path: &Path) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.strip_suffix(path).is_some())
    }

    /// Remove this format's suffix from `path`.
    ///
    /// Returns `None` if the file name does not end with the suffix.
    pub fn strip_suffix(self, path: &Path) -> Option<PathBuf> {
        let name = path.file_name()?.to_str()?;
        let stem = name.strip_suffix(self.suffix())?;
        if stem.is_empty() {
            return None;
        }
        Some(path.with_file_name(stem))
    }
}

impl std::fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ArchiveFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tar-bz2" | "tar.bz2" | "bz2" => Ok(Self::TarBz2),
            "conda" | ".conda" => Ok(Self::Conda),
            _ => Err(format!("Unknown archive format: {s}")),
        }
    }
}
