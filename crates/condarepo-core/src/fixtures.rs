//! Builders for throwaway package caches, used by the test suites.
//!
//! Compiled for this crate's unit tests and, behind the `fixtures` feature,
//! for downstream integration tests.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bzip2::Compression;
use bzip2::write::BzEncoder;
use condarepo_schema::ArchiveFormat;
use zip::write::SimpleFileOptions;

/// A tar member: path inside the archive and contents.
pub type Member<'a> = (&'a str, &'a [u8]);

/// Render `members` as an uncompressed tar stream.
///
/// Member names are written verbatim (a leading `./` is kept), unlike
/// `tar::Builder::append_data`, which normalizes them.
///
/// # Errors
///
/// Fails if a member name does not fit the tar header.
pub fn tar_bytes(members: &[Member<'_>]) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in members {
        let mut header = tar::Header::new_gnu();
        let raw_name = &mut header.as_old_mut().name;
        if name.len() >= raw_name.len() {
            return Err(io::Error::other(format!("member name too long: {name}")));
        }
        raw_name[..name.len()].copy_from_slice(name.as_bytes());
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append(&header, *data)?;
    }
    builder.into_inner()
}

/// Write a `.tar.bz2` archive.
///
/// # Errors
///
/// Propagates any I/O error from writing the archive.
pub fn write_tar_bz2(path: &Path, members: &[Member<'_>]) -> io::Result<()> {
    let tar = tar_bytes(members)?;
    let mut encoder = BzEncoder::new(File::create(path)?, Compression::best());
    encoder.write_all(&tar)?;
    encoder.finish()?;
    Ok(())
}

/// Write a plain zip archive with stored members.
///
/// # Errors
///
/// Propagates any I/O error from writing the archive.
pub fn write_zip(path: &Path, members: &[Member<'_>]) -> io::Result<()> {
    let mut zip = zip::ZipWriter::new(File::create(path)?);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for (name, data) in members {
        zip.start_file(*name, options).map_err(io::Error::other)?;
        zip.write_all(data)?;
    }
    zip.finish().map_err(io::Error::other)?;
    Ok(())
}

/// Write a `.conda` archive whose info tarball holds `info_members`.
///
/// # Errors
///
/// Propagates any I/O error from writing the archive.
pub fn write_conda(path: &Path, info_members: &[Member<'_>]) -> io::Result<()> {
    let stem = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(".conda"))
        .unwrap_or("package");

    let info = zstd::stream::encode_all(tar_bytes(info_members)?.as_slice(), 3)?;
    let pkg = zstd::stream::encode_all(tar_bytes(&[])?.as_slice(), 3)?;
    let info_name = format!("info-{stem}.tar.zst");
    let pkg_name = format!("pkg-{stem}.tar.zst");

    write_zip(
        path,
        &[
            ("metadata.json", br#"{"conda_pkg_format_version": 2}"#.as_slice()),
            (pkg_name.as_str(), pkg.as_slice()),
            (info_name.as_str(), info.as_slice()),
        ],
    )
}

/// Contents of an `info/index.json` with the four placement keys.
pub fn index_json(name: &str, version: &str, build: &str, subdir: &str) -> Vec<u8> {
    format!(
        r#"{{"name": "{name}", "version": "{version}", "build": "{build}", "build_number": 0, "depends": [], "subdir": "{subdir}"}}"#
    )
    .into_bytes()
}

/// Write a package archive named `file_name` into `dir`, in the format its
/// suffix implies, carrying `index` as `info/index.json`.
///
/// # Errors
///
/// Propagates any I/O error from writing the archive.
pub fn write_package(dir: &Path, file_name: &str, index: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(file_name);
    let members = [
        ("info/index.json", index),
        ("info/about.json", b"{}".as_slice()),
    ];
    match ArchiveFormat::detect(&path) {
        Some(ArchiveFormat::Conda) => write_conda(&path, &members)?,
        _ => write_tar_bz2(&path, &members)?,
    }
    Ok(path)
}

/// Create the unpacked sibling directory `dir/stem` with a repodata record.
///
/// # Errors
///
/// Propagates any I/O error from creating the directory or the record.
pub fn write_unpacked(dir: &Path, stem: &str, channel: &str, subdir: &str) -> io::Result<PathBuf> {
    let unpacked = dir.join(stem);
    fs::create_dir_all(unpacked.join("info"))?;
    fs::write(
        unpacked.join("info").join("repodata_record.json"),
        format!(r#"{{"channel": "{channel}", "subdir": "{subdir}", "fn": "{stem}"}}"#),
    )?;
    Ok(unpacked)
}
