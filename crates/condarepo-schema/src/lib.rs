//! Wire types shared by the condarepo crates.
//!
//! Everything here is pure data: the package index embedded in an archive,
//! the repodata record left next to an unpacked archive, and the archive
//! container formats the tool understands.

pub mod index;
pub mod record;
pub mod types;

// Re-exports
pub use index::{IndexError, PackageIndex};
pub use record::RepodataRecord;
pub use types::*;

/// Path of the package index inside every archive.
pub const INDEX_ENTRY: &str = "info/index.json";

/// Path of the repodata record inside an unpacked package directory.
pub const REPODATA_RECORD_ENTRY: &str = "info/repodata_record.json";

/// Channel name used when the originating channel cannot be recovered.
pub const UNKNOWN_CHANNEL: &str = "unknown";
