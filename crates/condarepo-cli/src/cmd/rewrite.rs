//! Rewrite command: copy a package cache into a repository tree

use std::sync::Arc;

use anyhow::{Context as _, Result, bail};
use condarepo_core::{Context, RepoSettings, rewrite_pkgs_dir_to_repo};

use crate::Cli;
use crate::ui::TerminalReporter;

/// Run the rewrite described by `cli`.
///
/// The copy runs on the blocking pool; Ctrl-C stops the run after the
/// archive currently being copied.
///
/// # Errors
///
/// Returns an error if the pipeline hits a non-recoverable error or the
/// run is interrupted.
pub async fn rewrite(cli: Cli) -> Result<()> {
    let Cli {
        pkg_dir,
        target_dir,
        formats,
        strict_sidecar,
        dry_run,
        quiet,
    } = cli;

    let settings = RepoSettings::default()
        .with_formats(&formats)
        .strict_sidecar(strict_sidecar)
        .dry_run(dry_run);
    tracing::debug!("Settings: {settings:?}");

    let reporter = Arc::new(TerminalReporter::new(quiet, dry_run));
    let ctx = Context::new(settings, reporter);

    let cancel = ctx.cancel.clone();
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, finishing current archive");
            cancel.cancel();
        }
    });

    let (source, target) = (pkg_dir.clone(), target_dir.clone());
    let result =
        tokio::task::spawn_blocking(move || rewrite_pkgs_dir_to_repo(&source, &target, &ctx))
            .await
            .context("rewrite task panicked")?;
    watcher.abort();

    let summary = result.with_context(|| {
        format!(
            "Failed to rewrite {} into {}",
            pkg_dir.display(),
            target_dir.display()
        )
    })?;

    if summary.interrupted {
        bail!(
            "Interrupted after placing {} archive(s)",
            summary.placed.len()
        );
    }
    Ok(())
}
