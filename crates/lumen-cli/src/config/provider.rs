//! Vision provider construction.

use lumen_vision::VisionService;
use lumen_vision::azure::{AzureClient, AzureConfig};

use crate::TRACING_TARGET_CONFIG;

/// Creates the vision service from the Azure configuration.
///
/// Missing or invalid credentials are not fatal: the server still starts,
/// reports `azure_configured: false` and answers analysis requests with a
/// `NOT_CONFIGURED` error.
pub fn create_vision_service(config: &AzureConfig) -> Option<VisionService> {
    if !config.is_configured() {
        tracing::warn!(
            target: TRACING_TARGET_CONFIG,
            "AZURE_ENDPOINT or AZURE_KEY is not set, image analysis is disabled"
        );
        return None;
    }

    match AzureClient::new(config.clone()) {
        Ok(client) => {
            tracing::info!(
                target: TRACING_TARGET_CONFIG,
                endpoint = ?config.endpoint,
                api_version = %config.api_version,
                timeout_secs = config.timeout_secs,
                "Azure AI Vision client initialized"
            );
            Some(client.into_service())
        }
        Err(error) => {
            tracing::error!(
                target: TRACING_TARGET_CONFIG,
                error = %error,
                "Failed to initialize Azure AI Vision client, image analysis is disabled"
            );
            None
        }
    }
}
