//! Batch categorization handler.

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::extract::State;
use axum::http::StatusCode;
use lumen_vision::{CategoryEntry, CategoryMap, Categorization, FailedImages, TopTag};

use crate::extract::{Json, ValidateJson, Vision};
use crate::handler::Result;
use crate::handler::request::CategorizeBatch;
use crate::handler::response::{BatchCategorization, Envelope, ErrorResponse};
use crate::service::{ServiceConfig, ServiceState};

/// Tracing target for categorization operations.
const TRACING_TARGET: &str = "lumen_server::handler::categorize";

/// Groups a batch of images by their highest-confidence tag.
///
/// Per-image failures are reported in `failed_images` and never fail the
/// request.
#[tracing::instrument(skip_all, fields(batch_size = request.image_urls.len()))]
async fn categorize_batch(
    State(service_config): State<ServiceConfig>,
    Vision(vision): Vision,
    ValidateJson(request): ValidateJson<CategorizeBatch>,
) -> Result<(StatusCode, Json<BatchCategorization>)> {
    let image_urls = request.into_urls()?;

    tracing::debug!(target: TRACING_TARGET, "Categorizing images");

    let categorization = vision
        .categorize(
            image_urls,
            service_config.batch_concurrency(),
            service_config.batch_timeout(),
        )
        .await;

    tracing::info!(
        target: TRACING_TARGET,
        categories = categorization.category_map.len(),
        categorized = categorization.categorized_count(),
        failed = categorization.failed_images.len(),
        "Images categorized"
    );

    Ok((StatusCode::OK, Json(Envelope::new(categorization))))
}

fn categorize_batch_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Categorize images")
        .description(
            "Tags every image and groups the images by their top tag. Images whose \
             analysis fails or returns no tags are listed in `failed_images` with a reason.",
        )
        .response_with::<200, Json<BatchCategorization>, _>(|res| {
            res.description("Batch categorized by top tags.")
                .example(batch_categorization_example())
        })
        .response_with::<400, Json<ErrorResponse>, _>(|res| {
            res.description("A URL of the batch is not an absolute http or https URL.")
                .example(ErrorResponse::BAD_REQUEST.with_detail(
                    "Invalid image URL 'chimpanzee.jpg'. Must be an absolute http or https URL.",
                ))
        })
        .response_with::<500, Json<ErrorResponse>, _>(|res| {
            res.description("Azure client configuration error.")
                .example(ErrorResponse::NOT_CONFIGURED)
        })
}

fn batch_categorization_example() -> BatchCategorization {
    let entry = |name: &str, confidence: f64, urls: &[&str]| {
        let top_tag = TopTag {
            name: name.to_owned(),
            confidence,
        };
        let urls = urls.iter().map(|url| (*url).to_owned()).collect();
        (name.to_owned(), CategoryEntry { top_tag, urls })
    };

    let category_map = CategoryMap::from([
        entry(
            "animal",
            0.9999960064888,
            &[
                "https://content.eol.org/data/media/be/38/0e/30.6bf2d9f80954fa23e430abb549403f2c.jpg",
                "https://upload.wikimedia.org/wikipedia/commons/thumb/4/42/015_Chimpanzee_at_Kibale_forest_National_Park_Photo_by_Giles_Laurent.jpg/250px-015_Chimpanzee_at_Kibale_forest_National_Park_Photo_by_Giles_Laurent.jpg",
            ],
        ),
        entry(
            "clothing",
            0.9988645315170288,
            &["https://upload.wikimedia.org/wikipedia/commons/6/68/Akha_cropped_hires.JPG"],
        ),
        entry(
            "mammal",
            0.9992899894714355,
            &["https://content.eol.org/data/media/be/2e/10/30.324afcc0ad71720c4346a9b46bbaa7e0.jpg"],
        ),
    ]);

    let failed_images = FailedImages::from([(
        "https://example.com/missing.jpg".to_owned(),
        "Analysis failed: Azure responded with 404 Not Found".to_owned(),
    )]);

    Envelope::new(Categorization {
        category_map,
        failed_images,
    })
}

/// Returns routes for batch categorization.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(
            "/categorize_batch",
            post_with(categorize_batch, categorize_batch_docs),
        )
        .with_path_items(|item| item.tag("Categorization"))
}
