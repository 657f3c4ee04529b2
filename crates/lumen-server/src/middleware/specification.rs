//! OpenAPI specification middleware with Scalar UI integration.
//!
//! The specification is generated from aide's [`ApiRouter`] and served as
//! JSON next to a Scalar API reference UI.
//!
//! ```rust
//! use aide::axum::ApiRouter;
//! use axum::Router;
//! use lumen_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//!
//! let app: Router<()> = ApiRouter::new()
//!     .with_open_api(OpenApiConfig::default());
//! ```
//!
//! [`ApiRouter`]: aide::axum::ApiRouter

use aide::axum::ApiRouter;
use aide::openapi::{Info, License, OpenApi};
use aide::scalar::Scalar;
use axum::routing::{Router, get};
use axum::{Extension, Json};
#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// OpenAPI configuration for aide integration.
///
/// Configures the paths where the OpenAPI JSON specification and
/// Scalar UI will be served.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Path which exposes the OpenAPI JSON specification.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_JSON_PATH", default_value = "/openapi.json")
    )]
    pub open_api_json: String,

    /// Path which exposes the Scalar API reference UI.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "OPENAPI_SCALAR_PATH", default_value = "/docs")
    )]
    pub scalar_ui: String,
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            open_api_json: "/openapi.json".to_owned(),
            scalar_ui: "/docs".to_owned(),
        }
    }
}

/// Extension trait for [`ApiRouter`] to add OpenAPI documentation with Scalar UI.
///
/// [`ApiRouter`]: aide::axum::ApiRouter
pub trait RouterOpenApiExt<S> {
    /// Adds OpenAPI documentation routes with default API info.
    fn with_open_api(self, config: OpenApiConfig) -> Router<S>;

    /// Adds OpenAPI documentation routes with custom OpenAPI info.
    ///
    /// [`Info`]: aide::openapi::Info
    fn with_open_api_info(self, config: OpenApiConfig, info: Info) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: OpenApiConfig) -> Router<S> {
        let info = Info {
            title: "Image Analysis API".to_owned(),
            summary: Some("Image intelligence backed by Azure AI Vision".to_owned()),
            description: Some(
                "Analyzes publicly reachable images with Azure AI Vision. The API \
                extracts visual features such as tags, captions, objects and text, \
                computes smart crop regions for target aspect ratios, and groups \
                batches of images by their most confident tag."
                    .to_owned(),
            ),
            license: Some(License {
                name: "MIT".to_owned(),
                identifier: Some("MIT".to_owned()),
                ..License::default()
            }),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            ..Info::default()
        };

        self.with_open_api_info(config, info)
    }

    fn with_open_api_info(self, config: OpenApiConfig, info: Info) -> Router<S> {
        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi {
            info,
            ..OpenApi::default()
        };

        let scalar = Scalar::new(&config.open_api_json);
        let router = self
            .route(&config.scalar_ui, scalar.axum_route())
            .route(&config.open_api_json, get(serve_openapi));

        // Generate the specification and serve it as an extension.
        router.finish_api(&mut api).layer(Extension(api))
    }
}

#[cfg(test)]
mod tests {
    use axum_test::TestServer;
    use serde_json::Value;

    use super::*;
    use crate::handler::routes;
    use crate::service::{ServiceConfig, ServiceState};

    #[tokio::test]
    async fn specification_lists_every_endpoint() -> anyhow::Result<()> {
        let state = ServiceState::unconfigured(ServiceConfig::default());
        let app = routes()
            .with_open_api(OpenApiConfig::default())
            .with_state(state);
        let server = TestServer::new(app)?;

        let response = server.get("/openapi.json").await;
        response.assert_status_ok();

        let api: Value = response.json();
        assert_eq!(api["info"]["title"], "Image Analysis API");
        for path in [
            "/",
            "/health",
            "/analyze_image",
            "/crop_area_of_interest",
            "/categorize_batch",
        ] {
            assert!(api["paths"].get(path).is_some(), "missing {path}");
        }

        server.get("/docs").await.assert_status_ok();

        Ok(())
    }

    #[tokio::test]
    async fn specification_documents_examples() -> anyhow::Result<()> {
        let state = ServiceState::unconfigured(ServiceConfig::default());
        let app = routes()
            .with_open_api(OpenApiConfig::default())
            .with_state(state);
        let server = TestServer::new(app)?;

        let api: Value = server.get("/openapi.json").await.json();
        let example = |path: &str, method: &str, status: &str| {
            api["paths"][path][method]["responses"][status]["content"]["application/json"]
                ["example"]
                .clone()
        };

        assert_eq!(
            example("/analyze_image", "post", "400")["detail"],
            "Invalid visual feature name provided: 'FOO'."
        );
        assert_eq!(
            example("/analyze_image", "post", "200")["result"]["modelVersion"],
            "2023-10-01"
        );
        assert_eq!(
            example("/crop_area_of_interest", "post", "500")["error_code"],
            "NOT_CONFIGURED"
        );
        assert_eq!(
            example("/crop_area_of_interest", "post", "200")["result"]["crop_regions"][0]
                ["aspect_ratio"],
            0.9
        );
        assert!(
            example("/categorize_batch", "post", "200")["result"]["category_map"]["animal"]
                .is_object()
        );
        assert_eq!(example("/health", "get", "200")["azure_configured"], true);

        let operation = &api["paths"]["/analyze_image"]["post"];
        assert_eq!(
            operation["responses"]["503"]["description"],
            "Azure Image Analysis service is unavailable."
        );

        // Request field examples end up in the generated schemas.
        let text = api.to_string();
        assert!(text.contains(r#""examples":[["TAGS","CAPTION","OBJECTS"]]"#));
        assert!(text.contains(r#""examples":[[0.9,1.33,1.0]]"#));

        Ok(())
    }
}
