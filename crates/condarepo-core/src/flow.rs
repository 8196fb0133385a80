//! Per-archive flow
//!
//! Each archive moves through two explicit states:
//!
//! ```text
//! ArchiveRef --[inspect()]--> InspectedArchive --[place()]--> Placement
//! ```
//!
//! Inspection only reads (the archive and its unpacked sibling); placement
//! is the only step that writes, so a dry run simply stops short of it.

use std::path::Path;

use condarepo_schema::PackageIndex;

use crate::channel::{extract_channel, normalize_channel};
use crate::error::RepoError;
use crate::io::extract::{self, ExtractError};
use crate::place::{Placement, copy_into_place, output_path, validate_component};
use crate::settings::RepoSettings;
use crate::walk::ArchiveRef;

/// Read and decode the package index embedded in `archive`.
///
/// # Errors
///
/// Returns [`RepoError::CorruptArchive`] if the container or the entry
/// cannot be read or decoded, and [`RepoError::IncompleteIndex`] if a
/// required key is missing.
pub fn read_package_index(
    archive: &ArchiveRef,
    settings: &RepoSettings,
) -> Result<PackageIndex, RepoError> {
    let bytes = extract::read_entry(&archive.path, archive.format, &settings.index_entry).map_err(
        |e: ExtractError| RepoError::CorruptArchive {
            archive: archive.path.clone(),
            reason: e.to_string(),
        },
    )?;
    PackageIndex::from_slice(&bytes).map_err(|e| RepoError::from_index(&archive.path, e))
}

/// An archive whose metadata has been recovered and checked.
///
/// # Transitions
///
/// - [`place()`](Self::place) -> [`Placement`]
#[derive(Debug, Clone)]
pub struct InspectedArchive {
    /// The archive in the package cache.
    pub archive: ArchiveRef,
    /// Its embedded package index.
    pub index: PackageIndex,
    /// Normalized channel directory name.
    pub channel: String,
    /// Canonical filename in the repository.
    pub filename: String,
}

impl ArchiveRef {
    /// Recover everything needed to place this archive.
    ///
    /// # Errors
    ///
    /// Any [`RepoError`] from index or channel extraction, or
    /// [`RepoError::UnsafeComponent`] if the metadata would not form a
    /// plain `channel/subdir/filename` path.
    pub fn inspect(self, settings: &RepoSettings) -> Result<InspectedArchive, RepoError> {
        let index = read_package_index(&self, settings)?;
        let channel = normalize_channel(&extract_channel(&self, settings)?);
        let filename = index.canonical_filename(self.format);

        validate_component(&self.path, "channel", &channel)?;
        validate_component(&self.path, "subdir", &index.subdir)?;
        validate_component(&self.path, "filename", &filename)?;

        tracing::debug!(
            "Inspected {}: {}/{}/{}",
            self.path.display(),
            channel,
            index.subdir,
            filename
        );

        Ok(InspectedArchive {
            archive: self,
            index,
            channel,
            filename,
        })
    }
}

impl InspectedArchive {
    /// Repository path this archive belongs at.
    pub fn destination(&self, repo_root: &Path) -> std::path::PathBuf {
        output_path(repo_root, &self.channel, &self.index.subdir, &self.filename)
    }

    /// Copy the archive into `repo_root`, unless this is a dry run or the
    /// destination already is the archive.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::Io`] if directories cannot be created or the
    /// copy fails.
    pub fn place(self, repo_root: &Path, settings: &RepoSettings) -> Result<Placement, RepoError> {
        let destination = self.destination(repo_root);
        let copied = if settings.dry_run {
            false
        } else {
            copy_into_place(&self.archive.path, &destination)?
        };

        Ok(Placement {
            source: self.archive.path,
            destination,
            channel: self.channel,
            subdir: self.index.subdir,
            copied,
        })
    }
}
