//! Middleware configuration for the HTTP server.
//!
//! All middleware configs are re-exported from `lumen-server` and support
//! both CLI arguments and environment variables.
//!
//! ```bash
//! lumen --allowed-origins "https://example.com" --request-timeout 60
//! ```

use clap::Args;
use lumen_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration combining CORS, OpenAPI, and recovery settings.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// CORS (Cross-Origin Resource Sharing) configuration.
    #[clap(flatten)]
    pub cors: CorsConfig,

    /// OpenAPI documentation configuration.
    #[clap(flatten)]
    pub openapi: OpenApiConfig,

    /// Recovery middleware configuration.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates middleware configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero request timeout or documentation paths
    /// that are not absolute.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.recovery.request_timeout == 0 {
            anyhow::bail!("Request timeout must be at least 1 second.");
        }

        for path in [&self.openapi.open_api_json, &self.openapi.scalar_ui] {
            if !path.starts_with('/') {
                anyhow::bail!("Documentation path '{path}' must start with '/'.");
            }
        }

        if self.openapi.open_api_json == self.openapi.scalar_ui {
            anyhow::bail!("OpenAPI JSON and Scalar UI paths must differ.");
        }

        Ok(())
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?self.cors.allowed_origins,
            credentials = self.cors.allow_credentials,
            "CORS configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            openapi_path = %self.openapi.open_api_json,
            scalar_path = %self.openapi.scalar_ui,
            "OpenAPI configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            "Recovery configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MiddlewareConfig {
        MiddlewareConfig {
            cors: CorsConfig::default(),
            openapi: OpenApiConfig::default(),
            recovery: RecoveryConfig::default(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn relative_documentation_paths_are_invalid() {
        let mut config = config();
        config.openapi.scalar_ui = "docs".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_request_timeout_is_invalid() {
        let mut config = config();
        config.recovery = RecoveryConfig::with_timeout_secs(0);
        assert!(config.validate().is_err());
    }
}
