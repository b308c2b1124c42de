//! Version sources for Go modules
//!
//! This module provides:
//! - The `VersionSource` trait the manifest loader fetches through
//! - HTTP client shared foundation with retry logic
//! - Go Module Proxy implementation

mod client;
mod go_proxy;

pub use client::HttpClient;
pub use go_proxy::{GoProxySource, DEFAULT_PROXY_URL};

use crate::domain::Version;
use crate::error::RegistryError;
use async_trait::async_trait;

/// Provider of published versions for module paths.
///
/// Calls may be slow and fail independently; retrying is up to the implementation.
#[async_trait]
pub trait VersionSource: Send + Sync {
    /// Name used in logs and error messages
    fn name(&self) -> &'static str;

    /// List every published version of a module
    async fn list_versions(&self, module: &str) -> Result<Vec<Version>, RegistryError>;

    /// The version the source currently resolves the module to
    async fn current_version(&self, module: &str) -> Result<Version, RegistryError>;
}
