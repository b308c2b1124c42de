//! Application error types using thiserror
//!
//! Error hierarchy:
//! - CheckError: failures fatal to a whole check run (manifest, cancellation)
//! - DependencyError: per-dependency outcomes recorded inside a CheckResult
//! - RegistryError: issues talking to the module proxy
//! - ConfigError: issues loading gomodcheck.toml or environment overrides

use serde::{Serialize, Serializer};
use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Fatal check errors
    #[error(transparent)]
    Check(#[from] CheckError),

    /// Module proxy errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors that abort a resolution run as a whole
#[derive(Error, Debug)]
pub enum CheckError {
    /// go.mod does not exist at the resolved location
    #[error("manifest file not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// go.mod exists but could not be read
    #[error("failed to read manifest file {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// go.mod content is not a valid module file
    #[error("malformed manifest {path} at line {line}: {message}")]
    ManifestMalformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// The run was interrupted before it completed
    #[error("operation cancelled")]
    Cancelled,
}

/// Outcome attached to a single dependency instead of failing the run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DependencyError {
    /// The selection strategy had nothing to choose from
    #[error("no version available")]
    NoVersionAvailable,

    /// The module is listed in `ignored_modules`
    #[error("module ignored")]
    ModuleIgnored,

    /// Looking up versions failed
    #[error("version source unavailable: {message}")]
    VersionSourceUnavailable { message: String },

    /// Rewriting the pin in go.mod failed
    #[error("failed to write new version: {message}")]
    WriteFailed { message: String },
}

/// Errors related to module proxy communication
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Module not found in the proxy (404 / 410)
    #[error("module '{package}' not found in {registry}")]
    PackageNotFound { package: String, registry: String },

    /// Network request failed
    #[error("failed to fetch module '{package}' from {registry}: {message}")]
    NetworkError {
        package: String,
        registry: String,
        message: String,
    },

    /// Rate limit exceeded
    #[error("rate limit exceeded for {registry}")]
    RateLimitExceeded { registry: String },

    /// Invalid response from the proxy
    #[error("invalid response from {registry} for '{package}': {message}")]
    InvalidResponse {
        package: String,
        registry: String,
        message: String,
    },

    /// Timeout
    #[error("timeout while fetching '{package}' from {registry}")]
    Timeout { package: String, registry: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for the expected schema
    #[error("failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// A value from the environment or CLI is invalid
    #[error("invalid value '{value}' for {key}: {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

impl CheckError {
    /// Creates a new ManifestNotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        CheckError::ManifestNotFound { path: path.into() }
    }

    /// Creates a new ManifestMalformed error
    pub fn malformed(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        CheckError::ManifestMalformed {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Returns true for an interrupted run
    pub fn is_cancelled(&self) -> bool {
        matches!(self, CheckError::Cancelled)
    }
}

impl DependencyError {
    /// Creates a new VersionSourceUnavailable error
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        DependencyError::VersionSourceUnavailable {
            message: message.into(),
        }
    }

    /// Creates a new WriteFailed error
    pub fn write_failed(message: impl Into<String>) -> Self {
        DependencyError::WriteFailed {
            message: message.into(),
        }
    }

    /// Stable machine-readable name used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            DependencyError::NoVersionAvailable => "no_version_available",
            DependencyError::ModuleIgnored => "module_ignored",
            DependencyError::VersionSourceUnavailable { .. } => "version_source_unavailable",
            DependencyError::WriteFailed { .. } => "write_failed",
        }
    }

    /// Ignored modules are an intentional skip, not a failure
    pub fn is_failure(&self) -> bool {
        !matches!(self, DependencyError::ModuleIgnored)
    }
}

impl From<RegistryError> for DependencyError {
    fn from(err: RegistryError) -> Self {
        DependencyError::source_unavailable(err.to_string())
    }
}

impl Serialize for DependencyError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("DependencyError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl RegistryError {
    /// Creates a new PackageNotFound error
    pub fn package_not_found(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::PackageNotFound {
            package: package.into(),
            registry: registry.into(),
        }
    }

    /// Creates a new NetworkError
    pub fn network_error(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::NetworkError {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidResponse error
    pub fn invalid_response(
        package: impl Into<String>,
        registry: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        RegistryError::InvalidResponse {
            package: package.into(),
            registry: registry.into(),
            message: message.into(),
        }
    }

    /// Creates a new Timeout error
    pub fn timeout(package: impl Into<String>, registry: impl Into<String>) -> Self {
        RegistryError::Timeout {
            package: package.into(),
            registry: registry.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new InvalidValue error
    pub fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}
