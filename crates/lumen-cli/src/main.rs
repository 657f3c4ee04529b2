#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use axum::Router;
use lumen_server::handler::routes;
use lumen_server::middleware::{
    RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt, RouterSecurityExt,
    SecurityHeadersConfig,
};
use lumen_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig, create_vision_service};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "lumen_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "lumen_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "lumen_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    cli.init_tracing();
    cli.log();
    cli.validate()?;

    let vision = create_vision_service(&cli.azure);
    let state = ServiceState::new(vision, cli.service.clone());
    let router = create_router(state, &cli.middleware);

    server::serve(router, cli.server).await?;
    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs and tracing spans
/// 3. Security - CORS, security headers, compression
/// 4. Routes and documentation (innermost)
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    let api_routes: Router = routes()
        .with_open_api(middleware.openapi.clone())
        .with_state(state);

    api_routes
        .with_security(&middleware.cors, &SecurityHeadersConfig::default())
        .with_observability()
        .with_recovery(&middleware.recovery)
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use lumen_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
    use lumen_server::service::ServiceConfig;
    use lumen_vision::mock::MockProvider;

    use super::*;

    fn middleware() -> MiddlewareConfig {
        MiddlewareConfig {
            cors: CorsConfig::default(),
            openapi: OpenApiConfig::default(),
            recovery: RecoveryConfig::default(),
        }
    }

    #[tokio::test]
    async fn assembled_router_serves_health_and_docs() -> anyhow::Result<()> {
        let vision = MockProvider::new().into_service();
        let state = ServiceState::new(Some(vision), ServiceConfig::default());
        let server = TestServer::new(create_router(state, &middleware()))?;

        let response = server.get("/health").await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({
            "status": "healthy",
            "azure_configured": true,
        }));
        assert!(response.headers().contains_key("x-request-id"));

        server.get("/openapi.json").await.assert_status_ok();
        server.get("/docs").await.assert_status_ok();
        Ok(())
    }

    #[tokio::test]
    async fn unconfigured_router_still_starts() -> anyhow::Result<()> {
        let state = ServiceState::unconfigured(ServiceConfig::default());
        let server = TestServer::new(create_router(state, &middleware()))?;

        let response = server.get("/health").await;
        response.assert_json(&serde_json::json!({
            "status": "healthy",
            "azure_configured": false,
        }));

        server
            .post("/analyze_image")
            .json(&serde_json::json!({ "image_url": "https://example.com/cat.jpg" }))
            .await
            .assert_status_internal_server_error();
        Ok(())
    }
}
