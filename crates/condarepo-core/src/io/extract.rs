//! Single-entry extraction from package archives
//!
//! Streams through `.tar.bz2` and `.conda` containers until the requested
//! member is found and returns its bytes. Nothing is written to disk.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use bzip2::read::BzDecoder;
use thiserror::Error;
use zip::ZipArchive;
use zstd::stream::read::Decoder as ZstdDecoder;

use condarepo_schema::ArchiveFormat;

/// Failure to pull a member out of an archive.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Reading or decompressing the file failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The container structure is invalid.
    #[error("Archive error: {0}")]
    Archive(String),

    /// The container is readable but lacks the member.
    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

/// Read the member `entry` of `archive_path` into memory.
///
/// For `.conda` archives `entry` is looked up inside the `info-*.tar.zst`
/// member, which is where the `info/` tree lives.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] if the file cannot be read or decompressed,
/// [`ExtractError::Archive`] if the container is invalid, and
/// [`ExtractError::EntryNotFound`] if `entry` is absent.
pub fn read_entry(
    archive_path: &Path,
    format: ArchiveFormat,
    entry: &str,
) -> Result<Vec<u8>, ExtractError> {
    match format {
        ArchiveFormat::TarBz2 => read_tar_bz2_entry(archive_path, entry),
        ArchiveFormat::Conda => read_conda_entry(archive_path, entry),
    }
}

/// Read a member of a bzip2-compressed tar archive
///
/// # Errors
///
/// Same as [`read_entry`].
pub fn read_tar_bz2_entry(archive_path: &Path, entry: &str) -> Result<Vec<u8>, ExtractError> {
    let file = File::open(archive_path)?;
    let reader = BufReader::new(file);
    let bz_decoder = BzDecoder::new(reader);

    read_tar_entry(bz_decoder, entry)
}

/// Read a member of the info tarball inside a `.conda` zip
///
/// # Errors
///
/// Same as [`read_entry`]; a zip without an `info-*.tar.zst` member is
/// [`ExtractError::EntryNotFound`].
pub fn read_conda_entry(archive_path: &Path, entry: &str) -> Result<Vec<u8>, ExtractError> {
    let file = File::open(archive_path)?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| ExtractError::Archive(e.to_string()))?;

    let info_member = archive
        .file_names()
        .find(|name| name.starts_with("info-") && name.ends_with(".tar.zst"))
        .map(str::to_owned)
        .ok_or_else(|| ExtractError::EntryNotFound("info-*.tar.zst".to_string()))?;

    let member = archive
        .by_name(&info_member)
        .map_err(|e| ExtractError::Archive(e.to_string()))?;
    let zstd_decoder = ZstdDecoder::new(member)?;

    read_tar_entry(zstd_decoder, entry)
}

/// Scan a tar stream for `entry` and return its contents
fn read_tar_entry<R: Read>(reader: R, entry: &str) -> Result<Vec<u8>, ExtractError> {
    let wanted = Path::new(entry);
    let mut archive = tar::Archive::new(reader);

    for member in archive.entries()? {
        let mut member = member?;

        if !member.header().entry_type().is_file() {
            continue;
        }

        // Some builders write members as "./info/index.json"
        let is_wanted = {
            let path = member.path()?;
            path.strip_prefix(".").unwrap_or(&path) == wanted
        };
        if !is_wanted {
            continue;
        }

        let mut contents = Vec::new();
        member.read_to_end(&mut contents)?;
        return Ok(contents);
    }

    Err(ExtractError::EntryNotFound(entry.to_string()))
}
