//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the ResolutionMap
//! - Per-module update outcomes for the update command

use crate::domain::{CheckResult, CheckSummary, ResolutionMap, VersionChangeType};
use crate::manifest::{UpdateOutcome, WriteResult};
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Quiet mode emits the summary only
    verbosity: Verbosity,
}

impl JsonFormatter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// One module in check output
#[derive(Serialize)]
struct JsonModule<'a> {
    #[serde(flatten)]
    result: &'a CheckResult,
    update_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    change: Option<VersionChangeType>,
}

impl<'a> From<&'a CheckResult> for JsonModule<'a> {
    fn from(result: &'a CheckResult) -> Self {
        let change = match &result.latest_version {
            Some(latest) if result.has_update() => {
                Some(VersionChangeType::between(&result.local_version, latest))
            }
            _ => None,
        };
        Self {
            result,
            update_available: result.has_update(),
            change,
        }
    }
}

#[derive(Serialize)]
struct JsonCheckOutput<'a> {
    summary: CheckSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    modules: Option<BTreeMap<&'a str, JsonModule<'a>>>,
}

#[derive(Serialize)]
struct JsonUpdateSummary {
    updated: usize,
    failed: usize,
    file_modified: bool,
}

#[derive(Serialize)]
struct JsonUpdateOutput<'a> {
    path: String,
    dry_run: bool,
    summary: JsonUpdateSummary,
    check: CheckSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    modules: Option<&'a BTreeMap<String, UpdateOutcome>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    errors: BTreeMap<&'a str, String>,
}

impl JsonFormatter {
    fn include_modules(&self) -> bool {
        self.verbosity != Verbosity::Quiet
    }

    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut *writer, value)?;
        writeln!(writer)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_check(
        &self,
        results: &ResolutionMap,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let modules = self.include_modules().then(|| {
            results
                .iter()
                .map(|(name, result)| (name.as_str(), JsonModule::from(result)))
                .collect()
        });

        let output = JsonCheckOutput {
            summary: CheckSummary::from_results(results),
            modules,
        };
        Self::write_json(&output, writer)
    }

    fn format_update(
        &self,
        results: &ResolutionMap,
        written: &WriteResult,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let errors = results
            .iter()
            .filter(|(_, result)| result.is_failure())
            .filter_map(|(name, result)| {
                result
                    .error
                    .as_ref()
                    .map(|e| (name.as_str(), e.to_string()))
            })
            .collect();

        let output = JsonUpdateOutput {
            path: written.path.display().to_string(),
            dry_run: written.dry_run,
            summary: JsonUpdateSummary {
                updated: written.updates_applied(),
                failed: written.updates_failed(),
                file_modified: written.file_modified(),
            },
            check: CheckSummary::from_results(results),
            modules: self.include_modules().then_some(&written.outcomes),
            errors,
        };
        Self::write_json(&output, writer)
    }
}
