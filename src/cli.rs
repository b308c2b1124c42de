//! CLI argument parsing module for gomodcheck

use crate::config::Config;
use crate::policy::Strategy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Check and update Go module dependencies
#[derive(Parser, Debug, Clone)]
#[command(
    name = "gomodcheck",
    version,
    about = "Check Go module dependencies for newer versions"
)]
pub struct CliArgs {
    /// Path to go.mod or the directory containing it (default: ./go.mod)
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    /// Configuration file (default: gomodcheck.toml in the module, current or home directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output (debug logging, skipped modules)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Enable quiet mode - summary only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Version selection strategy
    #[arg(long, global = true, value_enum)]
    pub strategy: Option<Strategy>,

    /// Maximum number of simultaneous version lookups
    #[arg(long, global = true, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Go module proxy base URL
    #[arg(long, global = true)]
    pub proxy: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Report available updates without changing go.mod
    Check,
    /// Rewrite go.mod pins to the selected versions
    Update {
        /// Show what would be updated without making changes
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

impl CliArgs {
    /// Whether the run may modify go.mod
    pub fn is_dry_run(&self) -> bool {
        matches!(self.command, Command::Update { dry_run: true })
    }

    /// Apply command-line overrides on top of file and environment settings
    pub fn override_config(&self, mut config: Config) -> Config {
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = usize::from(concurrency);
        }
        if let Some(proxy) = &self.proxy {
            config.proxy = proxy.clone();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_check_defaults() {
        let args = CliArgs::parse_from(["gomodcheck", "check"]);
        assert_eq!(args.command, Command::Check);
        assert!(args.path.is_none());
        assert!(args.config.is_none());
        assert!(!args.json);
        assert!(!args.verbose);
        assert!(!args.quiet);
        assert!(args.strategy.is_none());
        assert!(args.concurrency.is_none());
        assert!(args.proxy.is_none());
        assert!(!args.is_dry_run());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(["gomodcheck"]).is_err());
    }

    #[test]
    fn test_update_dry_run() {
        let args = CliArgs::parse_from(["gomodcheck", "update"]);
        assert_eq!(args.command, Command::Update { dry_run: false });
        assert!(!args.is_dry_run());

        let args = CliArgs::parse_from(["gomodcheck", "update", "-n"]);
        assert!(args.is_dry_run());

        let args = CliArgs::parse_from(["gomodcheck", "update", "--dry-run"]);
        assert!(args.is_dry_run());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from([
            "gomodcheck",
            "check",
            "--path",
            "/some/module",
            "--json",
            "--strategy",
            "latest-stable",
        ]);
        assert_eq!(args.path, Some(PathBuf::from("/some/module")));
        assert!(args.json);
        assert_eq!(args.strategy, Some(Strategy::LatestStableOnly));
    }

    #[test]
    fn test_strategy_values() {
        for (name, expected) in [
            ("latest", Strategy::LatestOverall),
            ("latest-major", Strategy::LatestWithinMajor),
            ("latest-stable", Strategy::LatestStableOnly),
        ] {
            let args = CliArgs::parse_from(["gomodcheck", "--strategy", name, "check"]);
            assert_eq!(args.strategy, Some(expected));
        }
        assert!(CliArgs::try_parse_from(["gomodcheck", "--strategy", "newest", "check"]).is_err());
    }

    #[test]
    fn test_concurrency_must_be_positive() {
        let args = CliArgs::parse_from(["gomodcheck", "--concurrency", "4", "check"]);
        assert_eq!(args.concurrency, Some(4));
        assert!(CliArgs::try_parse_from(["gomodcheck", "--concurrency", "0", "check"]).is_err());
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(CliArgs::try_parse_from(["gomodcheck", "-v", "-q", "check"]).is_err());
    }

    #[test]
    fn test_override_config() {
        let args = CliArgs::parse_from([
            "gomodcheck",
            "--strategy",
            "latest-major",
            "--concurrency",
            "2",
            "--proxy",
            "http://localhost:9000",
            "check",
        ]);
        let config = args.override_config(Config {
            ignored_modules: vec!["example.com/a".to_string()],
            ..Config::default()
        });

        assert_eq!(config.strategy, Strategy::LatestWithinMajor);
        assert_eq!(config.concurrency, 2);
        assert_eq!(config.proxy, "http://localhost:9000");
        assert_eq!(config.ignored_modules, vec!["example.com/a"]);
    }

    #[test]
    fn test_override_config_without_flags() {
        let args = CliArgs::parse_from(["gomodcheck", "check"]);
        assert_eq!(args.override_config(Config::default()), Config::default());
    }
}
