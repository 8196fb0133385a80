//! Package cache directory traversal.

use crate::error::RepoError;
use condarepo_schema::ArchiveFormat;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One archive found in the package cache.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveRef {
    /// Path to the archive file.
    pub path: PathBuf,
    /// Container format, from the file suffix.
    pub format: ArchiveFormat,
}

impl ArchiveRef {
    /// Wrap `path` if its name carries a known archive suffix.
    pub fn detect(path: impl Into<PathBuf>) -> Option<Self> {
        let path = path.into();
        let format = ArchiveFormat::detect(&path)?;
        Some(Self { path, format })
    }

    /// Where the package manager unpacks this archive: the same path with
    /// the archive suffix removed.
    pub fn unpacked_dir(&self) -> PathBuf {
        self.format
            .strip_suffix(&self.path)
            .unwrap_or_else(|| self.path.clone())
    }
}

/// The archives sitting directly in a package cache directory.
///
/// Listing is lazy and restartable: every call to [`iter`](Self::iter)
/// reads the directory afresh. No order is guaranteed; use
/// [`sorted`](Self::sorted) when it matters.
#[derive(Debug, Clone)]
pub struct ArchiveListing {
    dir: PathBuf,
    formats: Vec<ArchiveFormat>,
}

impl ArchiveListing {
    /// Prepare a listing of `dir` restricted to `formats`.
    ///
    /// # Errors
    ///
    /// Returns [`RepoError::NotADirectory`] if `dir` is not a directory.
    pub fn open(dir: &Path, formats: &[ArchiveFormat]) -> Result<Self, RepoError> {
        if !dir.is_dir() {
            return Err(RepoError::NotADirectory(dir.to_path_buf()));
        }
        Ok(Self {
            dir: dir.to_path_buf(),
            formats: formats.to_vec(),
        })
    }

    /// The directory being listed.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Regular files directly inside the directory whose name ends with an
    /// enabled suffix. Symlinks are followed; subdirectories are not
    /// descended into.
    pub fn iter(&self) -> impl Iterator<Item = ArchiveRef> + '_ {
        WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry in {}: {e}", self.dir.display());
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| ArchiveRef::detect(entry.into_path()))
            .filter(|archive| self.formats.contains(&archive.format))
    }

    /// All archives, ordered by path.
    pub fn sorted(&self) -> Vec<ArchiveRef> {
        let mut archives: Vec<_> = self.iter().collect();
        archives.sort();
        archives
    }
}

impl<'a> IntoIterator for &'a ArchiveListing {
    type Item = ArchiveRef;
    type IntoIter = Box<dyn Iterator<Item = ArchiveRef> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}
