//! condarepo - conda package cache to file repository converter
#![allow(clippy::doc_markdown)]
//!
//! Reads the `pkgs` directory of an existing Conda or Mamba installation
//! and copies every cached archive into a repository tree that
//! `conda index` can turn into an offline channel.
//!
//! # Output Layout
//!
//! ```text
//! <target-dir>/
//! ├── conda-forge/          # channel recovered from info/repodata_record.json
//! │   ├── linux-64/
//! │   │   └── bzip2-1.0.8-h7f98852_4.tar.bz2
//! │   └── noarch/
//! └── unknown/              # unpacked directory already cleaned up
//!     └── linux-64/
//! ```

pub mod cmd;
pub mod ui;

use clap::Parser;
use condarepo_schema::ArchiveFormat;
use std::path::PathBuf;

#[allow(missing_docs)] // clap derives help from doc comments; explicit `about` below
#[derive(Debug, Parser)]
#[command(name = "condarepo")]
#[command(
    author,
    version,
    about = "Converts a conda pkgs directory into file repository structures indexable by conda index"
)]
pub struct Cli {
    /// Source pkgs directory from an existing Conda or Mamba installation
    #[arg(long, env = "CONDAREPO_PKG_DIR", value_name = "DIR")]
    pub pkg_dir: PathBuf,

    /// Target directory to create file repositories in (need not be empty)
    #[arg(long, env = "CONDAREPO_TARGET_DIR", value_name = "DIR")]
    pub target_dir: PathBuf,

    /// Archive format to pick up: tar-bz2 or conda (repeatable, default: both)
    #[arg(long = "format", value_name = "FORMAT")]
    pub formats: Vec<ArchiveFormat>,

    /// Abort when an unpacked package directory has a missing or broken
    /// repodata record, instead of skipping that archive
    #[arg(long)]
    pub strict_sidecar: bool,

    /// Show where archives would go without copying anything
    #[arg(long)]
    pub dry_run: bool,

    /// Suppress per-archive output
    #[arg(short, long)]
    pub quiet: bool,
}
