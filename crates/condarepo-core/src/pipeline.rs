//! Package cache to repository rewrite.
//!
//! Every archive in the cache is inspected and placed on its own; nothing
//! carries over from one archive to the next except the target tree.
//! Recoverable failures skip the archive, anything else aborts the run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::error::RepoError;
use crate::place::Placement;
use crate::settings::RepoSettings;
use crate::walk::{ArchiveListing, ArchiveRef};

/// An archive left out of the repository, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedArchive {
    /// The archive in the package cache.
    pub archive: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// Outcome of a completed (or interrupted) run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Archives placed, in processing order.
    pub placed: Vec<Placement>,
    /// Archives skipped with a recoverable error.
    pub skipped: Vec<SkippedArchive>,
    /// The run was cancelled before every archive was processed.
    pub interrupted: bool,
}

impl RunSummary {
    /// Number of placed archives per `(channel, subdir)` bucket.
    pub fn buckets(&self) -> BTreeMap<(&str, &str), usize> {
        let mut buckets = BTreeMap::new();
        for placement in &self.placed {
            *buckets
                .entry((placement.channel.as_str(), placement.subdir.as_str()))
                .or_insert(0) += 1;
        }
        buckets
    }
}

/// Inspect one archive and place it under `repo_dir`.
///
/// # Errors
///
/// Any [`RepoError`] raised along the way, recoverable or not; the caller
/// decides what to do with it.
pub fn process_archive(
    archive: ArchiveRef,
    repo_dir: &Path,
    settings: &RepoSettings,
) -> Result<Placement, RepoError> {
    archive.inspect(settings)?.place(repo_dir, settings)
}

/// Rewrite the package cache `pkg_dir` into a channel/platform repository
/// rooted at `repo_dir`.
///
/// Archives are processed in path order. `repo_dir` need not be empty;
/// existing files at the same output path are overwritten.
///
/// # Errors
///
/// Returns [`RepoError::NotADirectory`] if `pkg_dir` is not a directory,
/// or the first non-recoverable error hit while processing an archive.
/// Files placed before the error stay in place.
pub fn rewrite_pkgs_dir_to_repo(
    pkg_dir: &Path,
    repo_dir: &Path,
    ctx: &Context,
) -> Result<RunSummary, RepoError> {
    let settings = ctx.settings.as_ref();
    let archives = ArchiveListing::open(pkg_dir, &settings.formats)?.sorted();

    tracing::info!(
        "Rewriting {} archive(s) from {} into {}",
        archives.len(),
        pkg_dir.display(),
        repo_dir.display()
    );
    ctx.reporter.starting(pkg_dir, archives.len());

    let mut summary = RunSummary::default();
    for archive in archives {
        if ctx.cancel.is_cancelled() {
            tracing::info!("Cancelled before {}", archive.path.display());
            summary.interrupted = true;
            break;
        }

        let path = archive.path.clone();
        match process_archive(archive, repo_dir, settings) {
            Ok(placement) => {
                ctx.reporter.placed(&placement);
                summary.placed.push(placement);
            }
            Err(e) if e.is_recoverable(settings) => {
                tracing::debug!("Skipping {}: {e}", path.display());
                ctx.reporter.skipped(&path, &e);
                summary.skipped.push(SkippedArchive {
                    archive: path,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    tracing::info!(
        "Placed {} archive(s), skipped {}",
        summary.placed.len(),
        summary.skipped.len()
    );
    ctx.reporter.summary(&summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::reporter::Reporter;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::{TempDir, tempdir};
    use tokio_util::sync::CancellationToken;
    use walkdir::WalkDir;

    struct Workspace {
        _root: TempDir,
        pkgs: PathBuf,
        repo: PathBuf,
    }

    impl Workspace {
        fn new() -> Self {
            let root = tempdir().unwrap();
            let pkgs = root.path().join("pkgs");
            let repo = root.path().join("repo");
            fs::create_dir(&pkgs).unwrap();
            Self {
                _root: root,
                pkgs,
                repo,
            }
        }

        fn package(&self, file_name: &str, name: &str, version: &str, build: &str, subdir: &str) -> PathBuf {
            fixtures::write_package(
                &self.pkgs,
                file_name,
                &fixtures::index_json(name, version, build, subdir),
            )
            .unwrap()
        }

        fn run(&self, settings: RepoSettings) -> Result<RunSummary, RepoError> {
            rewrite_pkgs_dir_to_repo(&self.pkgs, &self.repo, &Context::silent(settings))
        }

        /// Relative path -> contents of every file under the repository.
        fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
            WalkDir::new(&self.repo)
                .into_iter()
                .map(Result::unwrap)
                .filter(|e| e.file_type().is_file())
                .map(|e| {
                    let rel = e.path().strip_prefix(&self.repo).unwrap().to_path_buf();
                    (rel, fs::read(e.path()).unwrap())
                })
                .collect()
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<String>>,
    }

    impl Reporter for RecordingReporter {
        fn starting(&self, _: &Path, count: usize) {
            self.events.lock().unwrap().push(format!("start {count}"));
        }
        fn placed(&self, placement: &Placement) {
            self.events
                .lock()
                .unwrap()
                .push(format!("placed {}", placement.destination.file_name().unwrap().to_string_lossy()));
        }
        fn skipped(&self, archive: &Path, _: &RepoError) {
            self.events
                .lock()
                .unwrap()
                .push(format!("skipped {}", archive.file_name().unwrap().to_string_lossy()));
        }
        fn summary(&self, summary: &RunSummary) {
            self.events
                .lock()
                .unwrap()
                .push(format!("summary {}/{}", summary.placed.len(), summary.skipped.len()));
        }
    }

    #[test]
    fn places_archive_without_sibling_under_unknown() {
        let ws = Workspace::new();
        let source = ws.package("bzip2.tar.bz2", "bzip2", "1.0.8", "h7f98852_4", "linux-64");

        let summary = ws.run(RepoSettings::default()).unwrap();

        let expected = ws.repo.join("unknown/linux-64/bzip2-1.0.8-h7f98852_4.tar.bz2");
        assert_eq!(summary.placed.len(), 1);
        assert_eq!(summary.placed[0].destination, expected);
        assert_eq!(fs::read(&expected).unwrap(), fs::read(&source).unwrap());
        assert_eq!(ws.snapshot().len(), 1);
    }

    #[test]
    fn places_archive_with_sibling_under_its_channel() {
        let ws = Workspace::new();
        ws.package("1.tar.bz2", "bzip2", "1.0.8", "h7f98852_4", "linux-64");
        fixtures::write_unpacked(&ws.pkgs, "1", "conda-forge", "linux-64").unwrap();

        ws.run(RepoSettings::default()).unwrap();

        assert!(
            ws.repo
                .join("conda-forge/linux-64/bzip2-1.0.8-h7f98852_4.tar.bz2")
                .is_file()
        );
    }

    #[test]
    fn second_run_is_idempotent() {
        let ws = Workspace::new();
        ws.package("a.tar.bz2", "a", "1.0", "0", "noarch");
        ws.package("b.conda", "b", "2.0", "py_1", "linux-64");
        fixtures::write_unpacked(&ws.pkgs, "b", "https://repo.example/main/linux-64", "linux-64")
            .unwrap();

        ws.run(RepoSettings::default()).unwrap();
        let first = ws.snapshot();
        ws.run(RepoSettings::default()).unwrap();

        assert_eq!(ws.snapshot(), first);
        assert_eq!(
            first.keys().cloned().collect::<Vec<_>>(),
            [
                PathBuf::from("repo.example_main/linux-64/b-2.0-py_1.conda"),
                PathBuf::from("unknown/noarch/a-1.0-0.tar.bz2"),
            ]
        );
    }

    #[test]
    fn corrupt_archive_is_skipped() {
        let ws = Workspace::new();
        fs::write(ws.pkgs.join("0-broken.tar.bz2"), b"not an archive").unwrap();
        ws.package("1-good.tar.bz2", "good", "1", "0", "noarch");

        let summary = ws.run(RepoSettings::default()).unwrap();

        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].archive, ws.pkgs.join("0-broken.tar.bz2"));
        assert_eq!(summary.placed.len(), 1);
        assert!(ws.repo.join("unknown/noarch/good-1-0.tar.bz2").is_file());
    }

    #[test]
    fn broken_sidecar_skips_by_default_and_aborts_when_strict() {
        let ws = Workspace::new();
        ws.package("a.tar.bz2", "a", "1", "0", "noarch");
        fs::create_dir(ws.pkgs.join("a")).unwrap();
        ws.package("b.tar.bz2", "b", "1", "0", "noarch");

        let summary = ws.run(RepoSettings::default()).unwrap();
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.placed.len(), 1);

        let err = ws.run(RepoSettings::default().strict_sidecar(true)).unwrap_err();
        assert!(matches!(err, RepoError::MissingOrMalformedSidecar { .. }));
    }

    #[test]
    fn incomplete_index_aborts_after_earlier_placements() {
        let ws = Workspace::new();
        ws.package("a.tar.bz2", "a", "1", "0", "noarch");
        fixtures::write_package(&ws.pkgs, "b.tar.bz2", br#"{"name": "b", "version": "1"}"#)
            .unwrap();
        ws.package("c.tar.bz2", "c", "1", "0", "noarch");

        let err = ws.run(RepoSettings::default()).unwrap_err();
        assert!(matches!(err, RepoError::IncompleteIndex { .. }));
        assert!(ws.repo.join("unknown/noarch/a-1-0.tar.bz2").is_file());
        assert!(!ws.repo.join("unknown/noarch/c-1-0.tar.bz2").exists());
    }

    #[test]
    fn missing_source_directory_is_fatal() {
        let ws = Workspace::new();
        let err = rewrite_pkgs_dir_to_repo(
            &ws.pkgs.join("nope"),
            &ws.repo,
            &Context::silent(RepoSettings::default()),
        )
        .unwrap_err();
        assert!(matches!(err, RepoError::NotADirectory(_)));
    }

    #[test]
    fn dry_run_leaves_target_untouched() {
        let ws = Workspace::new();
        ws.package("a.tar.bz2", "a", "1", "0", "noarch");

        let summary = ws.run(RepoSettings::default().dry_run(true)).unwrap();

        assert_eq!(summary.placed.len(), 1);
        assert!(!summary.placed[0].copied);
        assert!(!ws.repo.exists());
    }

    #[test]
    fn cancelled_run_places_nothing() {
        let ws = Workspace::new();
        ws.package("a.tar.bz2", "a", "1", "0", "noarch");

        let cancel = CancellationToken::new();
        cancel.cancel();
        let ctx = Context::silent(RepoSettings::default()).with_cancellation(cancel);
        let summary = rewrite_pkgs_dir_to_repo(&ws.pkgs, &ws.repo, &ctx).unwrap();

        assert!(summary.interrupted);
        assert!(summary.placed.is_empty());
        assert!(!ws.repo.exists());
    }

    #[test]
    fn format_filter_is_honored() {
        let ws = Workspace::new();
        ws.package("a.tar.bz2", "a", "1", "0", "noarch");
        ws.package("b.conda", "b", "1", "0", "noarch");

        let settings = RepoSettings::default().with_formats(&[condarepo_schema::ArchiveFormat::Conda]);
        let summary = ws.run(settings).unwrap();

        assert_eq!(summary.placed.len(), 1);
        assert_eq!(summary.placed[0].destination, ws.repo.join("unknown/noarch/b-1-0.conda"));
    }

    #[test]
    fn reporter_sees_every_outcome_in_order() {
        let ws = Workspace::new();
        ws.package("a.tar.bz2", "a", "1", "0", "noarch");
        fs::write(ws.pkgs.join("b.tar.bz2"), b"junk").unwrap();

        let reporter = Arc::new(RecordingReporter::default());
        let ctx = Context::new(RepoSettings::default(), reporter.clone());
        rewrite_pkgs_dir_to_repo(&ws.pkgs, &ws.repo, &ctx).unwrap();

        assert_eq!(
            *reporter.events.lock().unwrap(),
            [
                "start 2",
                "placed a-1-0.tar.bz2",
                "skipped b.tar.bz2",
                "summary 1/1"
            ]
        );
    }

    #[test]
    fn cache_inside_previous_output_is_not_truncated() {
        let root = tempdir().unwrap();
        let repo = root.path().join("repo");
        let bucket = repo.join("unknown/linux-64");
        fs::create_dir_all(&bucket).unwrap();
        let archive = fixtures::write_package(
            &bucket,
            "bzip2-1.0.8-h7f98852_4.tar.bz2",
            &fixtures::index_json("bzip2", "1.0.8", "h7f98852_4", "linux-64"),
        )
        .unwrap();
        let before = fs::read(&archive).unwrap();

        let summary =
            rewrite_pkgs_dir_to_repo(&bucket, &repo, &Context::silent(RepoSettings::default()))
                .unwrap();

        assert_eq!(summary.placed.len(), 1);
        assert_eq!(summary.placed[0].destination, archive);
        assert!(!summary.placed[0].copied);
        assert_eq!(fs::read(&archive).unwrap(), before);
    }

    #[test]
    fn traversal_metadata_is_skipped_and_stays_inside_repo() {
        let ws = Workspace::new();
        ws.package("a-evil.tar.bz2", "evil", "1", "0", "..");
        ws.package("b-escape.tar.bz2", "escape", "1", "0", "linux-64");
        fixtures::write_unpacked(&ws.pkgs, "b-escape", "..", "linux-64").unwrap();
        ws.package("c-good.tar.bz2", "good", "1", "0", "noarch");

        let summary = ws.run(RepoSettings::default()).unwrap();

        assert_eq!(summary.skipped.len(), 2);
        assert_eq!(summary.placed.len(), 1);
        assert_eq!(
            ws.snapshot().keys().cloned().collect::<Vec<_>>(),
            [PathBuf::from("unknown/noarch/good-1-0.tar.bz2")]
        );

        let root = ws.repo.parent().unwrap();
        let mut siblings: Vec<_> = fs::read_dir(root)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        siblings.sort();
        assert_eq!(siblings, ["pkgs", "repo"]);
    }

    #[test]
    fn buckets_count_per_channel_and_subdir() {
        let ws = Workspace::new();
        ws.package("a.tar.bz2", "a", "1", "0", "noarch");
        ws.package("b.tar.bz2", "b", "1", "0", "noarch");
        ws.package("c.tar.bz2", "c", "1", "0", "linux-64");

        let summary = ws.run(RepoSettings::default().dry_run(true)).unwrap();
        let buckets = summary.buckets();

        assert_eq!(buckets.get(&("unknown", "noarch")), Some(&2));
        assert_eq!(buckets.get(&("unknown", "linux-64")), Some(&1));
    }
}
