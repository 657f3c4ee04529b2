//! Monitor response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Message returned by the root endpoint.
const ROOT_MESSAGE: &str = "Image Intelligence API is running. Check /docs for endpoints.";

/// Liveness status of the API.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RootStatus {
    /// Always `"ok"`.
    pub status: String,
    /// Pointer to the API documentation.
    pub message: String,
}

impl Default for RootStatus {
    fn default() -> Self {
        Self {
            status: "ok".to_owned(),
            message: ROOT_MESSAGE.to_owned(),
        }
    }
}

/// Health of the API and its vision configuration.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct HealthStatus {
    /// Always `"healthy"` while the process serves requests.
    pub status: String,
    /// Whether the vision client was configured at startup.
    pub azure_configured: bool,
}

impl HealthStatus {
    /// Creates a healthy status.
    pub fn healthy(azure_configured: bool) -> Self {
        Self {
            status: "healthy".to_owned(),
            azure_configured,
        }
    }
}
