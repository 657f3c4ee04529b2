//! CLI configuration management.
//!
//! ```text
//! Cli
//! ├── server: ServerConfig         # Host, port, shutdown
//! ├── middleware: MiddlewareConfig # CORS, OpenAPI, recovery/timeouts
//! ├── service: ServiceConfig       # Batch concurrency
//! ├── azure: AzureConfig           # Azure AI Vision endpoint and key
//! └── log_format: LogFormat        # pretty or json
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//!
//! # Example
//!
//! ```bash
//! lumen --azure-endpoint "https://name.cognitiveservices.azure.com/" --port 8080
//! AZURE_ENDPOINT="https://..." AZURE_KEY="..." PORT=8080 lumen
//! ```

mod middleware;
mod provider;
mod server;

use std::process;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use lumen_server::service::ServiceConfig;
use lumen_vision::azure::AzureConfig;
pub use middleware::MiddlewareConfig;
pub use provider::create_vision_service;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[derive(strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, colored output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "lumen")]
#[command(about = "Image analysis server backed by Azure AI Vision")]
#[command(version)]
pub struct Cli {
    /// Server network and lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (CORS, OpenAPI, timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,

    /// Request handling configuration.
    #[clap(flatten)]
    pub service: ServiceConfig,

    /// Azure AI Vision connection configuration.
    #[clap(flatten)]
    pub azure: AzureConfig,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Cli {
    /// Loads environment variables from a .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is read first so clap's `env` fallbacks can see its values.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// `RUST_LOG` overrides the default `info` level.
    pub fn init_tracing(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let registry = tracing_subscriber::registry().with(filter);

        match self.log_format {
            LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
            LogFormat::Json => registry
                .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
                .init(),
        }
    }

    fn log_build_info() {
        tracing::info!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            "starting lumen server"
        );

        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    ///
    /// Missing Azure credentials are not an error here; see
    /// [`create_vision_service`].
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        self.service
            .validate()
            .map_err(anyhow::Error::msg)
            .context("invalid service configuration")?;

        if self.service.batch_timeout >= self.middleware.recovery.request_timeout {
            anyhow::bail!(
                "Batch timeout {} seconds must be below the request timeout of {} seconds.",
                self.service.batch_timeout,
                self.middleware.recovery.request_timeout
            );
        }

        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.server.log();
        self.middleware.log();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            batch_concurrency = self.service.batch_concurrency,
            batch_timeout_secs = self.service.batch_timeout,
            azure_configured = self.azure.is_configured(),
            azure_api_version = %self.azure.api_version,
            azure_timeout_secs = self.azure.timeout_secs,
            log_format = %self.log_format,
            "Service configuration"
        );
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn arguments_override_defaults() {
        let cli = Cli::try_parse_from([
            "lumen",
            "--port",
            "9000",
            "--batch-concurrency",
            "4",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.server.port, 9000);
        assert_eq!(cli.service.batch_concurrency, 4);
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn batch_timeout_must_fit_in_request_timeout() {
        let cli = Cli::try_parse_from([
            "lumen",
            "--batch-timeout",
            "120",
            "--request-timeout",
            "120",
        ])
        .unwrap();
        assert!(cli.validate().is_err());

        let cli = Cli::try_parse_from(["lumen", "--batch-timeout", "60"]).unwrap();
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn out_of_range_concurrency_is_rejected() {
        assert!(Cli::try_parse_from(["lumen", "--batch-concurrency", "0"]).is_err());
        assert!(Cli::try_parse_from(["lumen", "--batch-concurrency", "33"]).is_err());
    }
}
