//! Go Module Proxy version source
//!
//! Fetches module version information from a GOPROXY-protocol server.
//! API endpoints:
//! - List versions: {proxy}/{module}/@v/list
//! - Latest version: {proxy}/{module}/@latest

use crate::domain::Version;
use crate::error::RegistryError;
use crate::registry::{HttpClient, VersionSource};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// Public Go Module Proxy base URL
pub const DEFAULT_PROXY_URL: &str = "https://proxy.golang.org";

const REGISTRY_NAME: &str = "Go Proxy";

/// Version source backed by a Go module proxy
pub struct GoProxySource {
    client: HttpClient,
    base_url: String,
}

/// `@latest` response
#[derive(Debug, Deserialize)]
struct LatestResponse {
    #[serde(rename = "Version")]
    version: String,
}

impl GoProxySource {
    /// Create a source for the public proxy
    pub fn new(client: HttpClient) -> Self {
        Self::with_base_url(client, DEFAULT_PROXY_URL)
    }

    /// Create a source for a custom proxy (e.g. a corporate mirror)
    pub fn with_base_url(client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the URL for listing versions
    fn build_list_url(&self, module: &str) -> String {
        format!("{}/{}/@v/list", self.base_url, Self::encode_module_path(module))
    }

    /// Build the URL for the latest version
    fn build_latest_url(&self, module: &str) -> String {
        format!("{}/{}/@latest", self.base_url, Self::encode_module_path(module))
    }

    /// Case-encode a module path: uppercase letters become `!lowercase`
    fn encode_module_path(module: &str) -> String {
        let mut encoded = String::with_capacity(module.len() + 4);
        for ch in module.chars() {
            if ch.is_ascii_uppercase() {
                encoded.push('!');
                encoded.push(ch.to_ascii_lowercase());
            } else {
                encoded.push(ch);
            }
        }
        encoded
    }

    /// Parse the newline-separated `@v/list` body, dropping entries that are not semver
    fn parse_version_list(module: &str, body: &str) -> Vec<Version> {
        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(|line| match Version::parse(line) {
                Ok(version) => Some(version),
                Err(e) => {
                    debug!(module, "skipping unparsable version: {}", e);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl VersionSource for GoProxySource {
    fn name(&self) -> &'static str {
        REGISTRY_NAME
    }

    async fn list_versions(&self, module: &str) -> Result<Vec<Version>, RegistryError> {
        let url = self.build_list_url(module);
        debug!(module, %url, "listing versions");
        let body = self.client.get_text(&url, module, REGISTRY_NAME).await?;

        let mut versions = Self::parse_version_list(module, &body);
        versions.sort();
        Ok(versions)
    }

    async fn current_version(&self, module: &str) -> Result<Version, RegistryError> {
        let url = self.build_latest_url(module);
        debug!(module, %url, "fetching latest version");
        let latest: LatestResponse = self.client.get_json(&url, module, REGISTRY_NAME).await?;

        Version::parse(&latest.version)
            .map_err(|e| RegistryError::invalid_response(module, REGISTRY_NAME, e.to_string()))
    }
}
