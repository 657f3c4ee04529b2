//! Single-image analysis and smart cropping handlers.
//!
//! Both endpoints make exactly one remote call. Request validation happens
//! first, so a rejected request never reaches the vision service.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::http::StatusCode;
use lumen_vision::{AnalysisResult, BoundingBox, CropRegion};
use serde_json::{Map, json};

use crate::extract::{Json, ValidateJson, Vision};
use crate::handler::request::{AnalyzeImage, CropAreaOfInterest};
use crate::handler::response::{CropAnalysis, CropRegions, Envelope, ErrorResponse, ImageAnalysis};
use crate::handler::{RemoteCall, Result};
use crate::service::ServiceState;

/// Tracing target for analysis operations.
const TRACING_TARGET: &str = "lumen_server::handler::analysis";

/// Analyzes one image for the requested visual features.
///
/// The remote result is returned unmodified.
#[tracing::instrument(skip_all)]
async fn analyze_image(
    Vision(vision): Vision,
    ValidateJson(request): ValidateJson<AnalyzeImage>,
) -> Result<(StatusCode, Json<ImageAnalysis>)> {
    let request = request.into_request()?;

    tracing::debug!(
        target: TRACING_TARGET,
        image_url = %request.image_url,
        features = ?request.features(),
        "Analyzing image"
    );

    let result = vision
        .analyze(&request)
        .await
        .map_err(|error| RemoteCall::ImageAnalysis.into_error(error))?;

    tracing::info!(
        target: TRACING_TARGET,
        sections = result.as_raw().len(),
        "Image analyzed"
    );

    Ok((StatusCode::OK, Json(Envelope::new(result))))
}

fn analyze_image_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Analyze image")
        .description(
            "Extracts the requested visual features from a publicly reachable image. \
             Features default to TAGS and CAPTION. The result is the raw Azure AI Vision \
             analysis object.",
        )
        .response_with::<200, Json<ImageAnalysis>, _>(|res| {
            res.description("Image analyzed successfully.")
                .example(image_analysis_example())
        })
        .response_with::<400, Json<ErrorResponse>, _>(|res| {
            res.description("Invalid features or input.").example(
                ErrorResponse::BAD_REQUEST
                    .with_detail("Invalid visual feature name provided: 'FOO'."),
            )
        })
        .response_with::<500, Json<ErrorResponse>, _>(|res| {
            res.description("Unexpected server error while analyzing the image.")
                .example(ErrorResponse::INTERNAL_SERVER_ERROR.with_detail(
                    "An unexpected server error occurred: invalid response body.",
                ))
        })
        .response_with::<503, Json<ErrorResponse>, _>(|res| {
            res.description("Azure Image Analysis service is unavailable.")
                .example(ErrorResponse::SERVICE_UNAVAILABLE.with_detail(
                    "Azure Image Analysis service call failed: request timed out. \
                     Check URL and feature validity.",
                ))
        })
}

fn image_analysis_example() -> ImageAnalysis {
    let tags = [
        ("mammal", 0.9998923540115356),
        ("animal", 0.9998763799667358),
        ("reptile", 0.9995557069778442),
        ("dinosaur", 0.9979144334793091),
        ("fossil", 0.9466491937637329),
        ("skeleton", 0.9339876174926758),
        ("museum", 0.8802951574325562),
    ]
    .map(|(name, confidence)| json!({ "name": name, "confidence": confidence }));

    let raw = Map::from_iter([
        ("modelVersion".to_owned(), json!("2023-10-01")),
        (
            "captionResult".to_owned(),
            json!({ "text": "a dinosaur skeleton in a museum", "confidence": 0.7875179648399353 }),
        ),
        ("metadata".to_owned(), json!({ "width": 2560, "height": 1696 })),
        ("tagsResult".to_owned(), json!({ "values": tags })),
    ]);

    Envelope::new(AnalysisResult::new(raw))
}

/// Computes smart crop regions for the requested aspect ratios.
#[tracing::instrument(skip_all)]
async fn crop_area_of_interest(
    Vision(vision): Vision,
    ValidateJson(request): ValidateJson<CropAreaOfInterest>,
) -> Result<(StatusCode, Json<CropAnalysis>)> {
    let (image_url, aspect_ratios) = request.into_parts()?;

    tracing::debug!(
        target: TRACING_TARGET,
        image_url = %image_url,
        aspect_ratios = ?aspect_ratios,
        "Computing crop regions"
    );

    let crop_regions = vision
        .smart_crops(image_url, aspect_ratios)
        .await
        .map_err(|error| RemoteCall::SmartCropping.into_error(error))?;

    tracing::info!(
        target: TRACING_TARGET,
        regions = crop_regions.len(),
        "Crop regions computed"
    );

    Ok((
        StatusCode::OK,
        Json(Envelope::new(CropRegions::from(crop_regions))),
    ))
}

fn crop_area_of_interest_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Compute crop regions")
        .description(
            "Suggests one crop region per aspect ratio. Every ratio must lie within \
             [0.75, 1.8]; ratios default to [0.9, 1.33, 1.0].",
        )
        .response_with::<200, Json<CropAnalysis>, _>(|res| {
            res.description("Smart crop regions computed successfully.")
                .example(crop_analysis_example())
        })
        .response_with::<400, Json<ErrorResponse>, _>(|res| {
            res.description("Aspect ratio out of range for Azure Smart Crops.")
                .example(ErrorResponse::BAD_REQUEST.with_detail(
                    "Invalid aspect ratios [0.5, 2.0]. Each aspect ratio must be \
                     between 0.75 and 1.8 inclusive.",
                ))
        })
        .response_with::<500, Json<ErrorResponse>, _>(|res| {
            res.description("Azure client configuration error.")
                .example(ErrorResponse::NOT_CONFIGURED)
        })
        .response_with::<503, Json<ErrorResponse>, _>(|res| {
            res.description("Azure Smart Cropping service call failed.")
                .example(ErrorResponse::SERVICE_UNAVAILABLE.with_detail(
                    "Azure Smart Cropping service call failed: request timed out",
                ))
        })
}

fn crop_analysis_example() -> CropAnalysis {
    let crop_regions = [
        (0.9, [40, 0, 1360, 1512]),
        (1.33, [0, 0, 2249, 1689]),
        (1.0, [120, 0, 1689, 1689]),
    ]
    .map(|(aspect_ratio, [x, y, width, height])| CropRegion {
        aspect_ratio,
        bounding_box: BoundingBox {
            x,
            y,
            width,
            height,
        },
    });

    Envelope::new(CropRegions::from(crop_regions.to_vec()))
}

/// Returns routes for single-image analysis.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route("/analyze_image", post_with(analyze_image, analyze_image_docs))
        .api_route(
            "/crop_area_of_interest",
            post_with(crop_area_of_interest, crop_area_of_interest_docs),
        )
        .with_path_items(|item| item.tag("Analysis"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use lumen_vision::mock::MockProvider;
    use lumen_vision::{Error as VisionError, VisualFeature};
    use serde_json::{Value, json};
    use url::Url;

    use super::*;
    use crate::handler::test::{create_test_server_with_router, mock_state};
    use crate::service::ServiceConfig;

    const IMAGE: &str = "https://images.example.com/cat.jpg";

    fn image() -> Url {
        Url::parse(IMAGE).unwrap()
    }

    #[tokio::test]
    async fn analyze_returns_raw_result() -> anyhow::Result<()> {
        let raw = json!({
            "modelVersion": "2023-10-01",
            "captionResult": { "text": "a cat on a sofa", "confidence": 0.87 },
            "tagsResult": { "values": [{ "name": "cat", "confidence": 0.99 }] },
        });
        let provider = MockProvider::new().with_response(image(), raw.clone());
        let (state, provider) = mock_state(provider);
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/analyze_image")
            .json(&json!({ "image_url": IMAGE }))
            .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "result": raw }));

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].features(),
            &[VisualFeature::Tags, VisualFeature::Caption]
        );

        Ok(())
    }

    #[tokio::test]
    async fn analyze_rejects_unknown_features() -> anyhow::Result<()> {
        let (state, provider) = mock_state(MockProvider::new());
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/analyze_image")
            .json(&json!({ "image_url": IMAGE, "features": ["TAGS", "FOO"] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "detail": "Invalid visual feature name provided: 'FOO'.",
            "error_code": "INVALID_INPUT",
        }));
        assert!(provider.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn analyze_rejects_empty_features() -> anyhow::Result<()> {
        let (state, provider) = mock_state(MockProvider::new());
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/analyze_image")
            .json(&json!({ "image_url": IMAGE, "features": [] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["detail"],
            "No valid visual features specified. Must be one or more."
        );
        assert!(provider.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn analyze_rejects_malformed_bodies() -> anyhow::Result<()> {
        let (state, _) = mock_state(MockProvider::new());
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/analyze_image")
            .json(&json!({ "features": ["TAGS"] }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server
            .post("/analyze_image")
            .json(&json!({ "image_url": "file:///etc/passwd" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = server.post("/analyze_image").text("{not json").await;
        response.assert_status(StatusCode::BAD_REQUEST);

        Ok(())
    }

    #[tokio::test]
    async fn analyze_maps_remote_failures() -> anyhow::Result<()> {
        let provider = MockProvider::new().with_failure(
            image(),
            VisionError::service_unavailable("Azure responded with 400 Bad Request: InvalidImageUrl"),
        );
        let (state, _) = mock_state(provider);
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/analyze_image")
            .json(&json!({ "image_url": IMAGE, "features": ["OBJECTS"] }))
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        response.assert_json(&json!({
            "detail": "Azure Image Analysis service call failed: Azure responded with 400 Bad Request: InvalidImageUrl. Check URL and feature validity.",
            "error_code": "SERVICE_UNAVAILABLE",
        }));

        Ok(())
    }

    #[tokio::test]
    async fn analysis_requires_configuration() -> anyhow::Result<()> {
        let state = ServiceState::unconfigured(ServiceConfig::default());
        let server = create_test_server_with_router(|_| routes(), state)?;

        for path in ["/analyze_image", "/crop_area_of_interest"] {
            // The body is not even examined.
            let response = server.post(path).text("{not json").await;

            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            response.assert_json(&json!({
                "detail": "Azure client not initialized. Check AZURE_ENDPOINT and AZURE_KEY configuration.",
                "error_code": "NOT_CONFIGURED",
            }));
        }

        Ok(())
    }

    #[tokio::test]
    async fn crop_returns_regions_in_remote_order() -> anyhow::Result<()> {
        let raw = json!({
            "modelVersion": "2023-10-01",
            "smartCropsResult": { "values": [
                { "aspectRatio": 1.33, "boundingBox": { "x": 10, "y": 20, "w": 400, "h": 300 } },
                { "aspectRatio": 0.9, "boundingBox": { "x": 0, "y": 0, "w": 270, "h": 300 } },
            ]},
        });
        let provider = MockProvider::new().with_response(image(), raw);
        let (state, provider) = mock_state(provider);
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/crop_area_of_interest")
            .json(&json!({ "image_url": IMAGE, "aspect_ratios": [1.33, 0.9] }))
            .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "result": { "crop_regions": [
            { "aspect_ratio": 1.33, "bounding_box": { "x": 10, "y": 20, "width": 400, "height": 300 } },
            { "aspect_ratio": 0.9, "bounding_box": { "x": 0, "y": 0, "width": 270, "height": 300 } },
        ]}}));

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].features(), &[VisualFeature::SmartCrops]);
        assert_eq!(calls[0].aspect_ratios, vec![1.33, 0.9]);

        Ok(())
    }

    #[tokio::test]
    async fn crop_uses_default_ratios() -> anyhow::Result<()> {
        let (state, provider) = mock_state(MockProvider::new());
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/crop_area_of_interest")
            .json(&json!({ "image_url": IMAGE }))
            .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "result": { "crop_regions": [] } }));
        assert_eq!(provider.calls()[0].aspect_ratios, vec![0.9, 1.33, 1.0]);

        Ok(())
    }

    #[tokio::test]
    async fn crop_rejects_out_of_range_ratios() -> anyhow::Result<()> {
        let (state, provider) = mock_state(MockProvider::new());
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/crop_area_of_interest")
            .json(&json!({ "image_url": IMAGE, "aspect_ratios": [0.5, 1.0] }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({
            "detail": "Invalid aspect ratios [0.5]. Each aspect ratio must be between 0.75 and 1.8 inclusive.",
            "error_code": "INVALID_INPUT",
        }));
        assert!(provider.calls().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn crop_maps_remote_failures() -> anyhow::Result<()> {
        let provider =
            MockProvider::new().with_failure(image(), VisionError::timeout("request timed out"));
        let (state, _) = mock_state(provider);
        let server = create_test_server_with_router(|_| routes(), state)?;

        let response = server
            .post("/crop_area_of_interest")
            .json(&json!({ "image_url": IMAGE, "aspect_ratios": [1.0] }))
            .await;

        response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
        let body: Value = response.json();
        assert_eq!(
            body["detail"],
            "Azure Smart Cropping service call failed: request timed out"
        );

        Ok(())
    }
}
