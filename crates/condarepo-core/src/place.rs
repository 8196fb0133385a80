//! Repository placement.
//!
//! Layout: `{repo_root}/{channel}/{subdir}/{name}-{version}-{build}{suffix}`

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::RepoError;

/// Where one archive ended up (or would end up, in a dry run).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// The archive in the package cache.
    pub source: PathBuf,
    /// Its path in the repository.
    pub destination: PathBuf,
    /// Normalized channel directory.
    pub channel: String,
    /// Platform subdirectory.
    pub subdir: String,
    /// Whether bytes were actually copied.
    pub copied: bool,
}

/// Compute the repository path for a package.
pub fn output_path(repo_root: &Path, channel: &str, subdir: &str, filename: &str) -> PathBuf {
    repo_root.join(channel).join(subdir).join(filename)
}

/// Check that `value` names exactly one directory entry.
///
/// # Errors
///
/// Returns [`RepoError::UnsafeComponent`] for empty values, `.`, `..`, or
/// anything containing a path separator.
pub fn validate_component(archive: &Path, field: &'static str, value: &str) -> Result<(), RepoError> {
    let unsafe_value =
        value.is_empty() || value == "." || value == ".." || value.contains(['/', '\\']);
    if unsafe_value {
        return Err(RepoError::UnsafeComponent {
            archive: archive.to_path_buf(),
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Copy `source` to `destination`, creating parent directories.
///
/// An existing file at `destination` is overwritten, unless it resolves to
/// `source` itself (the cache lives inside the repository, or a symlink
/// points back at the archive). Such a file is already in place and is left
/// untouched. Returns whether bytes were copied.
///
/// # Errors
///
/// Returns [`RepoError::Io`] if a directory cannot be created, either path
/// cannot be resolved, or the copy fails.
pub fn copy_into_place(source: &Path, destination: &Path) -> Result<bool, RepoError> {
    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| RepoError::io(parent, e))?;
    }
    if is_same_file(source, destination)? {
        tracing::debug!("{} is already in place", destination.display());
        return Ok(false);
    }
    fs::copy(source, destination).map_err(|e| RepoError::io(destination, e))?;
    tracing::debug!("Copied {} -> {}", source.display(), destination.display());
    Ok(true)
}

/// Whether `destination` exists and resolves to the same file as `source`.
fn is_same_file(source: &Path, destination: &Path) -> Result<bool, RepoError> {
    if !destination.exists() {
        return Ok(false);
    }
    let source = fs::canonicalize(source).map_err(|e| RepoError::io(source, e))?;
    let destination =
        fs::canonicalize(destination).map_err(|e| RepoError::io(destination, e))?;
    Ok(source == destination)
}
