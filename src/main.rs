//! gomodcheck - Go module dependency checker CLI tool
//!
//! Reports newer versions for the modules required by a go.mod and
//! optionally rewrites the pins.

use anyhow::Context;
use clap::Parser;
use gomodcheck::cancel::{cancellation, Cancellation};
use gomodcheck::checker::{Checker, Updater};
use gomodcheck::cli::{CliArgs, Command};
use gomodcheck::config::Config;
use gomodcheck::domain::CheckSummary;
use gomodcheck::error::CheckError;
use gomodcheck::manifest::{locate_manifest, manifest_dir};
use gomodcheck::output::{create_formatter, OutputConfig};
use gomodcheck::progress::Progress;
use gomodcheck::registry::{GoProxySource, HttpClient};
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

/// Exit code when a dependency could not be checked or written
const EXIT_PARTIAL: u8 = 2;
/// Exit code after Ctrl-C (128 + SIGINT)
const EXIT_CANCELLED: u8 = 130;

#[tokio::main]
async fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let (handle, cancel) = cancellation();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, cancelling");
            handle.cancel();
        }
    });

    match run(args, cancel).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            if e.downcast_ref::<CheckError>().is_some_and(CheckError::is_cancelled) {
                eprintln!("Cancelled");
                return ExitCode::from(EXIT_CANCELLED);
            }
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `--verbose` defaults to debug, `RUST_LOG` always wins
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "gomodcheck=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Main application logic
async fn run(args: CliArgs, cancel: Cancellation) -> anyhow::Result<ExitCode> {
    let manifest = locate_manifest(args.path.as_deref())?;

    let config = Config::load(
        args.config.as_deref(),
        &Config::search_dirs(manifest_dir(&manifest)),
    )?
    .apply_env()?;
    let config = args.override_config(config);
    debug!(?config, manifest = %manifest.display(), "starting");

    let client = HttpClient::new()?;
    let source = GoProxySource::with_base_url(client, config.proxy.as_str());
    let checker = Checker::new(Arc::new(source), config.ignore_policy())
        .with_strategy(config.strategy)
        .with_concurrency(config.concurrency);

    let output_config =
        OutputConfig::from_cli(args.json, args.verbose, args.quiet, args.is_dry_run());
    let formatter = create_formatter(output_config);
    let mut progress = Progress::new(!args.quiet && !args.json);

    let failed = match args.command {
        Command::Check => {
            progress.spinner(&format!("Checking {}", manifest.display()));
            let results = checker.check(Some(&manifest), &cancel).await?;
            progress.finish_and_clear();

            formatter
                .format_check(&results, &mut io::stdout().lock())
                .context("failed to write output")?;
            CheckSummary::from_results(&results).has_failures()
        }
        Command::Update { dry_run } => {
            progress.spinner(&format!("Updating {}", manifest.display()));
            let updater = Updater::new(checker, dry_run);
            let (results, written) = updater.update(Some(&manifest), &cancel).await?;
            progress.finish_and_clear();

            formatter
                .format_update(&results, &written, &mut io::stdout().lock())
                .context("failed to write output")?;
            CheckSummary::from_results(&results).has_failures() || written.has_errors()
        }
    };
    io::stdout().flush()?;

    if failed {
        Ok(ExitCode::from(EXIT_PARTIAL))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}
