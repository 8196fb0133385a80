//! Terminal implementation of the core [`Reporter`].
//!
//! Placements go to stdout (one line each, suppressed by `--quiet`).
//! Skip notices always go to stderr so they survive redirection of the
//! per-archive listing.

use std::io::Write;
use std::path::Path;

use comfy_table::{Table, presets};
use condarepo_core::{Placement, RepoError, Reporter, RunSummary};
use crossterm::style::{Color, Stylize};

use super::theme::Theme;

/// Prints run progress to the terminal.
#[derive(Debug, Clone, Default)]
pub struct TerminalReporter {
    theme: Theme,
    quiet: bool,
    dry_run: bool,
}

impl TerminalReporter {
    /// Create a reporter with the default theme.
    pub fn new(quiet: bool, dry_run: bool) -> Self {
        Self {
            theme: Theme::default(),
            quiet,
            dry_run,
        }
    }

    /// Render the per-bucket counts of `summary` as a table.
    pub fn bucket_table(summary: &RunSummary) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::NOTHING)
            .set_header(vec!["CHANNEL", "SUBDIR", "ARCHIVES"]);
        for ((channel, subdir), count) in summary.buckets() {
            table.add_row(vec![channel.to_string(), subdir.to_string(), count.to_string()]);
        }
        table
    }

    /// Closing count line, colored by how the run went.
    fn summary_line(&self, summary: &RunSummary) -> (String, Color) {
        let colors = &self.theme.colors;
        let verb = if self.dry_run { "Would place" } else { "Placed" };
        let counts = format!(
            "{verb} {}, skipped {}",
            summary.placed.len(),
            summary.skipped.len()
        );
        if summary.interrupted {
            (format!("Interrupted. {counts}"), colors.error)
        } else if summary.skipped.is_empty() {
            (counts, colors.success)
        } else {
            (counts, colors.warning)
        }
    }

    fn placed_line(&self, placement: &Placement) -> String {
        let colors = &self.theme.colors;
        let (icon, icon_color) = if placement.copied {
            (self.theme.icons.success, colors.success)
        } else {
            (self.theme.icons.pending, colors.secondary)
        };
        let name = placement
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        format!(
            "{} {}/{}/{}",
            icon.with(icon_color),
            placement.channel.as_str().with(colors.channel),
            placement.subdir.as_str().with(colors.subdir),
            name
        )
    }
}

impl Reporter for TerminalReporter {
    fn starting(&self, source: &Path, count: usize) {
        if self.quiet {
            return;
        }
        let verb = if self.dry_run { "Inspecting" } else { "Rewriting" };
        println!(
            "{}",
            format!("{verb} {count} archive(s) from {}", source.display())
                .with(self.theme.colors.secondary)
        );
    }

    fn placed(&self, placement: &Placement) {
        if self.quiet {
            return;
        }
        println!("{}", self.placed_line(placement));
    }

    fn skipped(&self, archive: &Path, reason: &RepoError) {
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "{} skipped {}: {}",
            self.theme.icons.warning.with(self.theme.colors.warning),
            archive.display(),
            reason
        );
    }

    fn summary(&self, summary: &RunSummary) {
        if !self.quiet && !summary.placed.is_empty() {
            println!();
            println!("{}", Self::bucket_table(summary));
        }

        let (line, color) = self.summary_line(summary);
        println!("{}", line.with(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn placement(channel: &str, subdir: &str, file: &str, copied: bool) -> Placement {
        Placement {
            source: PathBuf::from("/pkgs").join(file),
            destination: PathBuf::from("/repo").join(channel).join(subdir).join(file),
            channel: channel.to_string(),
            subdir: subdir.to_string(),
            copied,
        }
    }

    #[test]
    fn bucket_table_lists_each_channel_subdir_once() {
        let summary = RunSummary {
            placed: vec![
                placement("conda-forge", "linux-64", "a-1-0.conda", true),
                placement("conda-forge", "linux-64", "b-1-0.conda", true),
                placement("unknown", "noarch", "c-1-0.tar.bz2", true),
            ],
            ..RunSummary::default()
        };

        let rendered = TerminalReporter::bucket_table(&summary).to_string();
        assert!(rendered.contains("CHANNEL"));
        assert_eq!(rendered.matches("conda-forge").count(), 1);
        assert!(rendered.contains("unknown"));
        assert!(rendered.contains('2'));
    }

    #[test]
    fn summary_line_reflects_outcome() {
        let theme = Theme::default();
        let reporter = TerminalReporter::new(false, false);
        let mut summary = RunSummary {
            placed: vec![placement("unknown", "noarch", "a-1-0.tar.bz2", true)],
            ..RunSummary::default()
        };

        let (line, color) = reporter.summary_line(&summary);
        assert_eq!(line, "Placed 1, skipped 0");
        assert_eq!(color, theme.colors.success);

        summary.interrupted = true;
        let (line, color) = reporter.summary_line(&summary);
        assert!(line.starts_with("Interrupted."));
        assert_eq!(color, theme.colors.error);

        let (line, _) = TerminalReporter::new(false, true).summary_line(&RunSummary::default());
        assert_eq!(line, "Would place 0, skipped 0");
    }

    #[test]
    fn placed_line_names_destination() {
        let reporter = TerminalReporter::new(false, false);
        let line = reporter.placed_line(&placement("unknown", "linux-64", "bzip2-1.0.8-0.tar.bz2", true));
        assert!(line.contains("bzip2-1.0.8-0.tar.bz2"));
        assert!(line.contains("unknown"));
        assert!(line.contains("linux-64"));
    }
}
