//! Configuration loading
//!
//! Settings come from `gomodcheck.toml`, then `GOMODCHECK_*` environment
//! variables, then command-line flags (applied by the CLI layer).

use crate::error::ConfigError;
use crate::manifest::DEFAULT_CONCURRENCY;
use crate::policy::{IgnorePolicy, Strategy};
use crate::registry::DEFAULT_PROXY_URL;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file name looked up in the search directories
pub const CONFIG_FILE_NAME: &str = "gomodcheck.toml";

const ENV_IGNORED_MODULES: &str = "GOMODCHECK_IGNORED_MODULES";
const ENV_STRATEGY: &str = "GOMODCHECK_STRATEGY";
const ENV_CONCURRENCY: &str = "GOMODCHECK_CONCURRENCY";
const ENV_PROXY: &str = "GOMODCHECK_PROXY";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Module paths excluded from checking and updating
    pub ignored_modules: Vec<String>,
    pub strategy: Strategy,
    /// Maximum simultaneous version lookups
    pub concurrency: usize,
    /// Base URL of the Go module proxy
    pub proxy: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignored_modules: Vec::new(),
            strategy: Strategy::default(),
            concurrency: DEFAULT_CONCURRENCY,
            proxy: DEFAULT_PROXY_URL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `explicit`, or from the first search directory
    /// holding a `gomodcheck.toml`. No file found means defaults.
    pub fn load(explicit: Option<&Path>, search_dirs: &[PathBuf]) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover(search_dirs),
        };

        match path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content, path)
    }

    /// Parse TOML content; `path` is only used in error messages
    pub fn from_toml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if config.concurrency == 0 {
            return Err(ConfigError::invalid_value(
                "concurrency",
                "0",
                "must be at least 1",
            ));
        }
        Ok(config)
    }

    /// First directory in `search_dirs` containing a config file
    pub fn discover(search_dirs: &[PathBuf]) -> Option<PathBuf> {
        search_dirs
            .iter()
            .map(|dir| dir.join(CONFIG_FILE_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Directories searched for a config file: the manifest directory, the
    /// current directory, then the home directory
    pub fn search_dirs(manifest_dir: &Path) -> Vec<PathBuf> {
        search_dirs_with(
            manifest_dir,
            std::env::current_dir().ok(),
            dirs::home_dir(),
        )
    }

    /// Apply `GOMODCHECK_*` environment overrides
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Apply environment overrides read through `lookup`
    pub fn apply_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(modules) = lookup(ENV_IGNORED_MODULES) {
            self.ignored_modules.extend(
                modules
                    .split(',')
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .map(String::from),
            );
        }

        if let Some(name) = lookup(ENV_STRATEGY) {
            self.strategy = Strategy::from_name(&name).ok_or_else(|| {
                ConfigError::invalid_value(
                    ENV_STRATEGY,
                    &name,
                    "expected one of: latest, latest-major, latest-stable",
                )
            })?;
        }

        if let Some(value) = lookup(ENV_CONCURRENCY) {
            self.concurrency = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::invalid_value(
                        ENV_CONCURRENCY,
                        &value,
                        "must be a positive integer",
                    ))
                }
            };
        }

        if let Some(proxy) = lookup(ENV_PROXY) {
            let proxy = proxy.trim();
            if !proxy.is_empty() {
                self.proxy = proxy.to_string();
            }
        }

        Ok(self)
    }

    pub fn ignore_policy(&self) -> IgnorePolicy {
        IgnorePolicy::from_modules(&self.ignored_modules)
    }
}

fn search_dirs_with(
    manifest_dir: &Path,
    cwd: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut dirs = vec![manifest_dir.to_path_buf()];
    for dir in [cwd, home].into_iter().flatten() {
        if !dirs.contains(&dir) {
            dirs.push(dir);
        }
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.ignored_modules.is_empty());
        assert_eq!(config.strategy, Strategy::LatestOverall);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert_eq!(config.proxy, DEFAULT_PROXY_URL);
    }

    #[test]
    fn test_from_toml_full() {
        let config = Config::from_toml(
            r#"
ignored_modules = ["example.com/legacy", "example.com/fork"]
strategy = "latest-stable"
concurrency = 4
proxy = "https://goproxy.example.com"
"#,
            Path::new("gomodcheck.toml"),
        )
        .unwrap();

        assert_eq!(
            config.ignored_modules,
            vec!["example.com/legacy", "example.com/fork"]
        );
        assert_eq!(config.strategy, Strategy::LatestStableOnly);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.proxy, "https://goproxy.example.com");
    }

    #[test]
    fn test_from_toml_partial_uses_defaults() {
        let config =
            Config::from_toml("strategy = \"latest-major\"\n", Path::new("x.toml")).unwrap();
        assert_eq!(config.strategy, Strategy::LatestWithinMajor);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert!(config.ignored_modules.is_empty());
    }

    #[test]
    fn test_from_toml_rejects_unknown_strategy() {
        let err = Config::from_toml("strategy = \"newest\"\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        let err = Config::from_toml("ignore = [\"a\"]\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_from_toml_rejects_zero_concurrency() {
        let err = Config::from_toml("concurrency = 0\n", Path::new("x.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::load(Some(&missing), &[]).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }

    #[test]
    fn test_load_discovers_first_match() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join(CONFIG_FILE_NAME), "concurrency = 2\n").unwrap();

        let dirs = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let config = Config::load(None, &dirs).unwrap();
        assert_eq!(config.concurrency, 2);

        fs::write(first.path().join(CONFIG_FILE_NAME), "concurrency = 7\n").unwrap();
        let config = Config::load(None, &dirs).unwrap();
        assert_eq!(config.concurrency, 7);
    }

    #[test]
    fn test_load_without_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(None, &[dir.path().to_path_buf()]).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config {
            ignored_modules: vec!["example.com/a".to_string()],
            ..Config::default()
        }
        .apply_env_with(env(&[
            (ENV_IGNORED_MODULES, "example.com/b, ,example.com/c"),
            (ENV_STRATEGY, "latest-stable"),
            (ENV_CONCURRENCY, "3"),
            (ENV_PROXY, "http://localhost:3000"),
        ]))
        .unwrap();

        assert_eq!(
            config.ignored_modules,
            vec!["example.com/a", "example.com/b", "example.com/c"]
        );
        assert_eq!(config.strategy, Strategy::LatestStableOnly);
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.proxy, "http://localhost:3000");
    }

    #[test]
    fn test_env_without_overrides_is_unchanged() {
        let config = Config::default().apply_env_with(env(&[])).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_env_invalid_values() {
        let err = Config::default()
            .apply_env_with(env(&[(ENV_STRATEGY, "bogus")]))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_STRATEGY));

        for value in ["0", "-1", "many"] {
            let err = Config::default()
                .apply_env_with(env(&[(ENV_CONCURRENCY, value)]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidValue { .. }));
        }
    }

    #[test]
    fn test_ignore_policy() {
        let config = Config {
            ignored_modules: vec!["example.com/a".to_string(), "  ".to_string()],
            ..Config::default()
        };
        let policy = config.ignore_policy();
        assert!(policy.is_ignored("example.com/a"));
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_search_dirs_order_and_dedup() {
        let dirs = search_dirs_with(
            Path::new("/project"),
            Some(PathBuf::from("/project")),
            Some(PathBuf::from("/home/user")),
        );
        assert_eq!(
            dirs,
            vec![PathBuf::from("/project"), PathBuf::from("/home/user")]
        );

        let dirs = search_dirs_with(Path::new("/project"), None, None);
        assert_eq!(dirs, vec![PathBuf::from("/project")]);
    }
}
