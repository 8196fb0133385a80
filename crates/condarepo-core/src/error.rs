//! Errors raised while turning a package cache into a repository.

use crate::settings::RepoSettings;
use condarepo_schema::IndexError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can go wrong for one archive or for the whole run.
///
/// Use [`RepoError::is_recoverable`] to decide between skipping the archive
/// and aborting.
#[derive(Error, Debug)]
pub enum RepoError {
    /// The source path handed to the enumerator is not a directory.
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The archive container cannot be opened, or its index entry cannot be
    /// found, read or decoded.
    #[error("Could not read {}: {reason}", .archive.display())]
    CorruptArchive {
        /// The archive that could not be read.
        archive: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The unpacked sibling directory exists but its repodata record is
    /// missing or unparseable.
    #[error(
        "Unreadable repodata record {} for {}: {reason}",
        .sidecar.display(),
        .archive.display()
    )]
    MissingOrMalformedSidecar {
        /// The archive whose channel was being recovered.
        archive: PathBuf,
        /// The repodata record that was expected.
        sidecar: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// The package index decoded but lacks a required key.
    #[error(
        "Incomplete package index in {}: key '{key}' is missing or empty",
        .archive.display()
    )]
    IncompleteIndex {
        /// The archive carrying the incomplete index.
        archive: PathBuf,
        /// The missing key.
        key: &'static str,
    },

    /// Recovered metadata would not form a single directory or file name.
    #[error(
        "Refusing to place {}: {field} '{value}' is not a plain path component",
        .archive.display()
    )]
    UnsafeComponent {
        /// The archive the metadata came from.
        archive: PathBuf,
        /// Which part of the output path was rejected.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// Directory creation or copying failed.
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl RepoError {
    /// Whether the run may skip the offending archive and carry on.
    ///
    /// Sidecar failures are recoverable unless strict sidecar handling is on.
    pub fn is_recoverable(&self, settings: &RepoSettings) -> bool {
        match self {
            Self::CorruptArchive { .. } | Self::UnsafeComponent { .. } => true,
            Self::MissingOrMalformedSidecar { .. } => !settings.strict_sidecar,
            Self::NotADirectory(_) | Self::IncompleteIndex { .. } | Self::Io { .. } => false,
        }
    }

    /// The archive this error is about, if it concerns a single archive.
    pub fn archive(&self) -> Option<&Path> {
        match self {
            Self::CorruptArchive { archive, .. }
            | Self::MissingOrMalformedSidecar { archive, .. }
            | Self::IncompleteIndex { archive, .. }
            | Self::UnsafeComponent { archive, .. } => Some(archive),
            Self::NotADirectory(_) | Self::Io { .. } => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify an index decoding failure for `archive`.
    pub(crate) fn from_index(archive: &Path, err: IndexError) -> Self {
        match err {
            IndexError::MissingKey(key) => Self::IncompleteIndex {
                archive: archive.to_path_buf(),
                key,
            },
            other => Self::CorruptArchive {
                archive: archive.to_path_buf(),
                reason: other.to_string(),
            },
        }
    }
}
