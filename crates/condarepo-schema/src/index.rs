//! Package index (`info/index.json`) embedded in every package archive.

use crate::ArchiveFormat;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors that can occur when decoding a package index.
#[derive(thiserror::Error, Debug)]
pub enum IndexError {
    /// The entry bytes are not valid UTF-8.
    #[error("index is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The entry is not a JSON object.
    #[error("index is not a JSON object: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A required key is absent, empty, or not a string.
    #[error("index key '{0}' is missing or empty")]
    MissingKey(&'static str),
}

impl IndexError {
    /// Whether the index decoded but lacks required metadata.
    ///
    /// Decoding failures point at a damaged archive; a missing key means the
    /// archive is readable but not a well-formed package.
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::MissingKey(_))
    }
}

/// The metadata a package carries about itself.
///
/// Only the four keys needed to place a package are typed; everything else
/// (`depends`, `build_number`, `license`, ...) is kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageIndex {
    /// Package name (e.g. `bzip2`).
    pub name: String,
    /// Version string (e.g. `1.0.8`).
    pub version: String,
    /// Build string (e.g. `h7f98852_4`).
    pub build: String,
    /// Platform subdirectory (e.g. `linux-64`, `noarch`).
    pub subdir: String,
    /// Remaining keys of the index, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PackageIndex {
    /// Keys that must be present and non-empty.
    pub const REQUIRED_KEYS: [&'static str; 4] = ["name", "version", "build", "subdir"];

    /// Decode a package index from the raw bytes of `info/index.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::Encoding`] or [`IndexError::Malformed`] if the
    /// bytes are not a UTF-8 JSON object, and [`IndexError::MissingKey`] if
    /// a required key is absent or empty.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IndexError> {
        let text = std::str::from_utf8(bytes)?;
        let mut object: Map<String, Value> = serde_json::from_str(text)?;

        let name = take_required(&mut object, "name")?;
        let version = take_required(&mut object, "version")?;
        let build = take_required(&mut object, "build")?;
        let subdir = take_required(&mut object, "subdir")?;

        Ok(Self {
            name,
            version,
            build,
            subdir,
            extra: object,
        })
    }

    /// The filename the package manager itself gives this package:
    /// `{name}-{version}-{build}` followed by the format suffix.
    ///
    /// # Example
    ///
    /// ```
    /// use condarepo_schema::{ArchiveFormat, PackageIndex};
    ///
    /// let index = PackageIndex::from_slice(
    ///     br#"{"name":"treewalker","version":"1.0.0","build":"py_0","subdir":"noarch"}"#,
    /// )
    /// .unwrap();
    /// assert_eq!(
    ///     index.canonical_filename(ArchiveFormat::TarBz2),
    ///     "treewalker-1.0.0-py_0.tar.bz2"
    /// );
    /// ```
    pub fn canonical_filename(&self, format: ArchiveFormat) -> String {
        format!(
            "{}-{}-{}{}",
            self.name,
            self.version,
            self.build,
            format.suffix()
        )
    }
}

fn take_required(object: &mut Map<String, Value>, key: &'static str) -> Result<String, IndexError> {
    match object.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(IndexError::MissingKey(key)),
    }
}
