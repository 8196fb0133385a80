//! Reporter trait for dependency injection
//!
//! This trait allows the pipeline to report per-archive outcomes without
//! being coupled to a specific terminal implementation.

use crate::error::RepoError;
use crate::pipeline::RunSummary;
use crate::place::Placement;
use std::path::Path;

/// Receives per-archive outcomes as the pipeline runs.
pub trait Reporter: Send + Sync {
    /// Announce the start of a run over `count` archives.
    fn starting(&self, source: &Path, count: usize);

    /// An archive was placed (or would be, in a dry run).
    fn placed(&self, placement: &Placement);

    /// An archive was skipped because of a recoverable error.
    fn skipped(&self, archive: &Path, reason: &RepoError);

    /// Display the final summary of the run.
    fn summary(&self, summary: &RunSummary);
}

impl<T: Reporter + ?Sized> Reporter for std::sync::Arc<T> {
    fn starting(&self, source: &Path, count: usize) {
        (**self).starting(source, count);
    }
    fn placed(&self, placement: &Placement) {
        (**self).placed(placement);
    }
    fn skipped(&self, archive: &Path, reason: &RepoError) {
        (**self).skipped(archive, reason);
    }
    fn summary(&self, summary: &RunSummary) {
        (**self).summary(summary);
    }
}

/// A no-op reporter for silent operations (e.g., testing).
#[derive(Debug, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn starting(&self, _: &Path, _: usize) {}
    fn placed(&self, _: &Placement) {}
    fn skipped(&self, _: &Path, _: &RepoError) {}
    fn summary(&self, _: &RunSummary) {}
}
