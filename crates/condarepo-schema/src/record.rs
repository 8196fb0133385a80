//! Repodata record (`info/repodata_record.json`) written by the package
//! manager when it unpacks an archive into its cache.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The part of a repodata record needed to recover a package's channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepodataRecord {
    /// Channel the package was downloaded from, usually a URL that may end
    /// in the platform segment (`https://conda.anaconda.org/conda-forge/linux-64`).
    pub channel: String,
    /// Platform subdirectory of the package.
    pub subdir: String,
    /// Remaining keys of the record, untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RepodataRecord {
    /// Decode a record from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a JSON object with string
    /// `channel` and `subdir` fields.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// The channel with a trailing `/{subdir}` segment removed, so that it
    /// names the repository root rather than one platform of it.
    pub fn channel_root(&self) -> &str {
        let platform_segment = format!("/{}", self.subdir);
        self.channel
            .strip_suffix(platform_segment.as_str())
            .unwrap_or(&self.channel)
    }
}
