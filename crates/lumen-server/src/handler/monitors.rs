//! Liveness and health check handlers.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;

use crate::extract::Json;
use crate::handler::Result;
use crate::handler::response::{ErrorResponse, HealthStatus, RootStatus};
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "lumen_server::handler::monitors";

/// Reports that the API is running.
#[tracing::instrument(skip_all)]
async fn root_status() -> Result<(StatusCode, Json<RootStatus>)> {
    tracing::trace!(target: TRACING_TARGET, "Root status requested");
    Ok((StatusCode::OK, Json(RootStatus::default())))
}

fn root_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("API status")
        .description("Confirms that the API is running and points to the documentation.")
        .response_with::<200, Json<RootStatus>, _>(|res| {
            res.description("API status.").example(RootStatus::default())
        })
        .response_with::<500, Json<ErrorResponse>, _>(|res| {
            res.description("Unexpected server error while fetching API status.")
                .example(ErrorResponse::INTERNAL_SERVER_ERROR)
        })
}

/// Reports health and whether the vision client is configured.
#[tracing::instrument(skip_all)]
async fn health_status(
    State(state): State<ServiceState>,
) -> Result<(StatusCode, Json<HealthStatus>)> {
    let azure_configured = state.is_vision_configured();

    tracing::debug!(
        target: TRACING_TARGET,
        azure_configured,
        "Health status requested"
    );

    Ok((StatusCode::OK, Json(HealthStatus::healthy(azure_configured))))
}

fn health_status_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health check")
        .description(
            "Returns the health of the API. The process answering is healthy; \
             `azure_configured` tells whether analysis endpoints can be used.",
        )
        .response_with::<200, Json<HealthStatus>, _>(|res| {
            res.description("Health check status.")
                .example(HealthStatus::healthy(true))
        })
        .response_with::<500, Json<ErrorResponse>, _>(|res| {
            res.description("Unexpected server error while performing health check.")
                .example(ErrorResponse::INTERNAL_SERVER_ERROR)
        })
}

/// Returns routes for liveness and health checks.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/", get_with(root_status, root_status_docs))
        .api_route("/health", get_with(health_status, health_status_docs))
        .with_path_items(|item| item.tag("System"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use super::*;
    use crate::handler::test::{create_test_server_with_router, mock_state};
    use crate::service::ServiceConfig;

    #[tokio::test]
    async fn root_reports_running() -> anyhow::Result<()> {
        let state = ServiceState::unconfigured(ServiceConfig::default());
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server.get("/").await;
        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({
            "status": "ok",
            "message": "Image Intelligence API is running. Check /docs for endpoints.",
        }));

        Ok(())
    }

    #[tokio::test]
    async fn health_reports_unconfigured() -> anyhow::Result<()> {
        let state = ServiceState::unconfigured(ServiceConfig::default());
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server.get("/health").await;
        response.assert_status(StatusCode::OK);

        let body: Value = response.json();
        assert_eq!(body, json!({ "status": "healthy", "azure_configured": false }));

        Ok(())
    }

    #[tokio::test]
    async fn health_reports_configured() -> anyhow::Result<()> {
        let (state, _) = mock_state(lumen_vision::mock::MockProvider::new());
        let server = create_test_server_with_router(|_| routes(), state)?;

        let body: Value = server.get("/health").await.json();
        assert_eq!(body["azure_configured"], json!(true));

        Ok(())
    }
}
