//! Azure AI Vision client configuration.

use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Error, Result};

/// Default Image Analysis REST API version.
pub const DEFAULT_API_VERSION: &str = "2023-10-01";

/// Default timeout for a single remote call: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the Azure AI Vision client.
///
/// Endpoint and key are both optional: without them the server still starts
/// and reports the vision service as not configured.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct AzureConfig {
    /// Azure AI Vision resource endpoint
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-endpoint", env = "AZURE_ENDPOINT")
    )]
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Azure AI Vision subscription key
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-key", env = "AZURE_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub key: Option<String>,

    /// Image Analysis REST API version
    #[cfg_attr(
        feature = "config",
        arg(
            long = "azure-api-version",
            env = "AZURE_API_VERSION",
            default_value = DEFAULT_API_VERSION
        )
    )]
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Timeout for a single Azure call in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-timeout", env = "AZURE_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "azure-user-agent", env = "AZURE_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_owned()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            key: None,
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl fmt::Debug for AzureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureConfig")
            .field("endpoint", &self.endpoint)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("api_version", &self.api_version)
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl AzureConfig {
    /// Creates a configuration for the given endpoint and key.
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: Some(endpoint.into()),
            key: Some(key.into()),
            ..Self::default()
        }
    }

    /// Returns `true` when both endpoint and key are set and non-empty.
    pub fn is_configured(&self) -> bool {
        let present = |value: &Option<String>| {
            value
                .as_deref()
                .is_some_and(|value| !value.trim().is_empty())
        };

        present(&self.endpoint) && present(&self.key)
    }

    /// Returns the parsed endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`NotConfigured`](crate::ErrorKind::NotConfigured) error
    /// when the endpoint is missing or is not an absolute `http(s)` URL.
    pub fn endpoint_url(&self) -> Result<Url> {
        let endpoint = self
            .endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::not_configured("Azure endpoint is not set."))?;

        let url = Url::parse(endpoint).map_err(|e| {
            Error::not_configured(format!("Azure endpoint '{endpoint}' is not a valid URL: {e}"))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::not_configured(format!(
                "Azure endpoint '{endpoint}' must use http or https."
            )));
        }

        Ok(url)
    }

    /// Returns the timeout as a Duration, using the default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }

    /// Returns the effective user agent, using the default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("lumen/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Set the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
