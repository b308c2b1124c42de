//! Text output formatter for human-readable display
//!
//! This module provides:
//! - Aligned per-module lines with colors
//! - Semantic version change type indication (major/minor/patch)
//! - Skipped and failed module display with reasons
//! - Summary with a breakdown by change type

use crate::domain::{CheckResult, CheckSummary, ResolutionMap, Version, VersionChangeType};
use crate::manifest::{SkipReason, UpdateOutcome, WriteResult};
use crate::output::{OutputFormatter, Verbosity};
use colored::{ColoredString, Colorize};
use std::io::Write;

const MIN_NAME_WIDTH: usize = 20;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    dry_run: bool,
    color: bool,
}

impl TextFormatter {
    pub fn new(verbosity: Verbosity, dry_run: bool) -> Self {
        Self::with_color(verbosity, dry_run, true)
    }

    pub fn with_color(verbosity: Verbosity, dry_run: bool, color: bool) -> Self {
        Self {
            verbosity,
            dry_run,
            color,
        }
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn change_label(&self, change: VersionChangeType) -> String {
        let label = change.label();
        match change {
            VersionChangeType::Major => self.paint(label, |s| s.red().bold()),
            VersionChangeType::Minor => self.paint(label, |s| s.yellow()),
            VersionChangeType::Patch => self.paint(label, |s| s.green()),
            VersionChangeType::Prerelease => self.paint(label, |s| s.cyan()),
        }
    }

    fn dry_run_prefix(&self) -> String {
        if self.dry_run {
            format!("{} ", self.paint("(dry-run)", |s| s.cyan()))
        } else {
            String::new()
        }
    }

    fn name_width<'a>(names: impl Iterator<Item = &'a String>) -> usize {
        names.map(String::len).max().unwrap_or(0).max(MIN_NAME_WIDTH)
    }

    fn write_update_line(
        &self,
        name: &str,
        from: &Version,
        to: &Version,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let arrow = if self.color { "→" } else { "->" };
        writeln!(
            writer,
            "  {:width$} {} {} {} [{}]",
            name,
            self.paint(from.as_str(), |s| s.dimmed()),
            self.paint(arrow, |s| s.dimmed()),
            self.paint(to.as_str(), |s| s.bright_white().bold()),
            self.change_label(VersionChangeType::between(from, to)),
            width = width
        )
    }

    fn write_note_line(
        &self,
        name: &str,
        version: &Version,
        note: &str,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "  {} {} {}",
            self.paint(&format!("{:width$}", name, width = width), |s| s.dimmed()),
            self.paint(version.as_str(), |s| s.dimmed()),
            self.paint(&format!("({})", note), |s| s.dimmed())
        )
    }

    fn write_error_line(
        &self,
        name: &str,
        result: &CheckResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let message = result
            .error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        writeln!(
            writer,
            "  {:width$} {} {} {}",
            name,
            result.local_version,
            self.paint("✗", |s| s.red()),
            self.paint(&message, |s| s.red()),
            width = width
        )
    }

    fn write_check_line(
        &self,
        name: &str,
        result: &CheckResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        if result.is_ignored() {
            if self.verbosity == Verbosity::Verbose {
                self.write_note_line(name, &result.local_version, "ignored", width, writer)?;
            }
            return Ok(());
        }
        if result.is_failure() {
            return self.write_error_line(name, result, width, writer);
        }
        match &result.latest_version {
            Some(latest) if result.has_update() => {
                self.write_update_line(name, &result.local_version, latest, width, writer)
            }
            _ if self.verbosity == Verbosity::Verbose => {
                self.write_note_line(name, &result.local_version, "up to date", width, writer)
            }
            _ => Ok(()),
        }
    }

    fn write_summary(&self, summary: &CheckSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if summary.outdated == 0 && summary.failed == 0 {
            writeln!(writer, "  {}", self.paint("All modules up to date", |s| s.green()))?;
        } else {
            let mut parts = Vec::new();
            if summary.major > 0 {
                parts.push(format!("{} major", summary.major));
            }
            if summary.minor > 0 {
                parts.push(format!("{} minor", summary.minor));
            }
            if summary.patch > 0 {
                parts.push(format!("{} patch", summary.patch));
            }
            let breakdown = if parts.is_empty() {
                String::new()
            } else {
                format!(" ({})", parts.join(", "))
            };
            writeln!(
                writer,
                "  {} of {} module(s) outdated{}",
                self.paint(&summary.outdated.to_string(), |s| s.yellow()),
                summary.total,
                breakdown
            )?;
        }

        if summary.ignored > 0 {
            writeln!(writer, "  {} ignored", summary.ignored)?;
        }
        if summary.failed > 0 {
            writeln!(
                writer,
                "  {} failed",
                self.paint(&summary.failed.to_string(), |s| s.red())
            )?;
        }
        Ok(())
    }
}

impl OutputFormatter for TextFormatter {
    fn format_check(
        &self,
        results: &ResolutionMap,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let summary = CheckSummary::from_results(results);

        if self.verbosity != Verbosity::Quiet {
            let width = Self::name_width(results.keys());
            for (name, result) in results {
                self.write_check_line(name, result, width, writer)?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "{}:", self.paint("Summary", |s| s.bold()))?;
        self.write_summary(&summary, writer)
    }

    fn format_update(
        &self,
        results: &ResolutionMap,
        written: &WriteResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let prefix = self.dry_run_prefix();

        if self.verbosity != Verbosity::Quiet {
            let width = Self::name_width(written.outcomes.keys());
            writeln!(
                writer,
                "{}{}",
                prefix,
                self.paint(&written.path.display().to_string(), |s| s.bold())
            )?;

            for (name, outcome) in &written.outcomes {
                match outcome {
                    UpdateOutcome::Updated { from, to } => {
                        self.write_update_line(name, from, to, width, writer)?
                    }
                    UpdateOutcome::Failed { error } => writeln!(
                        writer,
                        "  {:width$} {} {}",
                        name,
                        self.paint("✗", |s| s.red()),
                        self.paint(&error.to_string(), |s| s.red()),
                        width = width
                    )?,
                    UpdateOutcome::Skipped {
                        reason: SkipReason::Errored,
                    } => {
                        if let Some(result) = results.get(name) {
                            self.write_error_line(name, result, width, writer)?;
                        }
                    }
                    UpdateOutcome::Skipped { reason } => {
                        if self.verbosity == Verbosity::Verbose {
                            if let Some(result) = results.get(name) {
                                self.write_note_line(
                                    name,
                                    &result.local_version,
                                    &reason.to_string(),
                                    width,
                                    writer,
                                )?;
                            }
                        }
                    }
                }
            }
            writeln!(writer)?;
        }

        let applied = written.updates_applied();
        let failed = written.updates_failed();
        let verb = if self.dry_run { "would be updated" } else { "updated" };

        writeln!(writer, "{}{}:", prefix, self.paint("Summary", |s| s.bold()))?;
        if applied == 0 {
            writeln!(writer, "  {}", self.paint("No modules updated", |s| s.dimmed()))?;
        } else {
            writeln!(
                writer,
                "  {} module(s) {}",
                self.paint(&applied.to_string(), |s| s.green()),
                verb
            )?;
        }
        if failed > 0 {
            writeln!(
                writer,
                "  {} write(s) failed",
                self.paint(&failed.to_string(), |s| s.red())
            )?;
        }
        let check_failures = CheckSummary::from_results(results).failed;
        if check_failures > 0 {
            writeln!(writer, "  {} module(s) could not be checked", check_failures)?;
        }
        Ok(())
    }
}
