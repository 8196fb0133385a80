//! Immutable run configuration.

use condarepo_schema::{ArchiveFormat, INDEX_ENTRY, REPODATA_RECORD_ENTRY, UNKNOWN_CHANNEL};

/// Knobs for one repository rewrite.
///
/// Built once (usually from command-line arguments) and shared read-only
/// by every stage of the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSettings {
    /// Archive formats picked up by the enumerator.
    pub formats: Vec<ArchiveFormat>,
    /// Entry holding the package index inside an archive.
    pub index_entry: String,
    /// Repodata record path relative to an unpacked package directory.
    pub sidecar_entry: String,
    /// Channel directory used when the channel cannot be recovered.
    pub unknown_channel: String,
    /// Abort the run on a present-but-unreadable repodata record instead of
    /// skipping the archive.
    pub strict_sidecar: bool,
    /// Compute placements without touching the target directory.
    pub dry_run: bool,
}

impl Default for RepoSettings {
    fn default() -> Self {
        Self {
            formats: ArchiveFormat::ALL.to_vec(),
            index_entry: INDEX_ENTRY.to_string(),
            sidecar_entry: REPODATA_RECORD_ENTRY.to_string(),
            unknown_channel: UNKNOWN_CHANNEL.to_string(),
            strict_sidecar: false,
            dry_run: false,
        }
    }
}

impl RepoSettings {
    /// Restrict the enumerator to `formats`. An empty list keeps the default.
    pub fn with_formats(mut self, formats: &[ArchiveFormat]) -> Self {
        if !formats.is_empty() {
            let mut formats = formats.to_vec();
            formats.sort_unstable();
            formats.dedup();
            self.formats = formats;
        }
        self
    }

    /// Toggle strict repodata record handling.
    pub fn strict_sidecar(mut self, strict: bool) -> Self {
        self.strict_sidecar = strict;
        self
    }

    /// Toggle dry-run mode.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
