//! Core library for condarepo.
//!
//! Turns a package manager's flat cache of downloaded archives into a
//! `{channel}/{subdir}/{name}-{version}-{build}.{ext}` repository tree that a
//! separate indexing tool can serve as an offline mirror.
//!
//! # Pipeline
//!
//! ```text
//! ArchiveListing --> ArchiveRef --[inspect()]--> InspectedArchive --[place()]--> Placement
//! ```
//!
//! - [`walk`] enumerates archives in the cache directory.
//! - [`flow`] reads the embedded package index and recovers the channel
//!   ([`channel`]) for one archive.
//! - [`place`] computes the output path and copies the archive.
//! - [`pipeline`] drives the above for a whole directory.

pub mod channel;
pub mod context;
pub mod error;
pub mod flow;
pub mod io;
pub mod pipeline;
pub mod place;
pub mod reporter;
pub mod settings;
pub mod walk;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use context::Context;
pub use error::RepoError;
pub use pipeline::{RunSummary, SkippedArchive, rewrite_pkgs_dir_to_repo};
pub use place::Placement;
pub use reporter::{NullReporter, Reporter};
pub use settings::RepoSettings;
pub use walk::{ArchiveListing, ArchiveRef};
