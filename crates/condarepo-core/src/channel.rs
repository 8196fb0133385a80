//! Channel recovery.
//!
//! Once a package manager has unpacked an archive it leaves a directory of
//! the same name next to it, holding `info/repodata_record.json` with the
//! URL the archive was downloaded from. That directory is the only place the
//! channel survives; when it has been cleaned up the channel is unknown.

use std::fs;

use condarepo_schema::RepodataRecord;

use crate::error::RepoError;
use crate::settings::RepoSettings;
use crate::walk::ArchiveRef;

/// Look up the repodata record of `archive`'s unpacked sibling.
///
/// - `Ok(None)`: no unpacked directory, so nothing to recover.
/// - `Ok(Some(_))`: the record was read.
/// - `Err(_)`: the directory exists but the record is missing or broken.
///
/// # Errors
///
/// Returns [`RepoError::MissingOrMalformedSidecar`] in the last case.
pub fn lookup_repodata_record(
    archive: &ArchiveRef,
    settings: &RepoSettings,
) -> Result<Option<RepodataRecord>, RepoError> {
    let unpacked = archive.unpacked_dir();
    if !unpacked.is_dir() {
        tracing::debug!("No unpacked directory for {}", archive.path.display());
        return Ok(None);
    }

    let sidecar = unpacked.join(&settings.sidecar_entry);
    let malformed = |reason: String| RepoError::MissingOrMalformedSidecar {
        archive: archive.path.clone(),
        sidecar: sidecar.clone(),
        reason,
    };

    let bytes = fs::read(&sidecar).map_err(|e| malformed(e.to_string()))?;
    let record = RepodataRecord::from_slice(&bytes).map_err(|e| malformed(e.to_string()))?;
    Ok(Some(record))
}

/// The channel `archive` was downloaded from, with any trailing platform
/// segment removed, or the unknown-channel sentinel.
///
/// # Errors
///
/// Propagates [`lookup_repodata_record`] failures.
pub fn extract_channel(archive: &ArchiveRef, settings: &RepoSettings) -> Result<String, RepoError> {
    let channel = match lookup_repodata_record(archive, settings)? {
        Some(record) => record.channel_root().to_string(),
        None => settings.unknown_channel.clone(),
    };
    Ok(channel)
}

/// Turn a channel URL into a single directory name.
///
/// Drops an `http://` or `https://` scheme and one trailing `/`, then
/// replaces the remaining `/` with `_`.
///
/// # Example
///
/// ```
/// use condarepo_core::channel::normalize_channel;
///
/// assert_eq!(normalize_channel("https://conda.anaconda.org/conda-forge"), "conda.anaconda.org_conda-forge");
/// assert_eq!(normalize_channel("conda-forge"), "conda-forge");
/// ```
pub fn normalize_channel(channel: &str) -> String {
    let channel = channel
        .strip_prefix("http://")
        .or_else(|| channel.strip_prefix("https://"))
        .unwrap_or(channel);
    let channel = channel.strip_suffix('/').unwrap_or(channel);
    channel.replace('/', "_")
}
