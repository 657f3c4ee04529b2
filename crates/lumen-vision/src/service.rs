//! Vision service wrapper with observability.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::stream;
use url::Url;

use crate::{
    AnalysisResult, AnalyzeRequest, Categorization, CropRegion, Error, Result, TRACING_TARGET,
    TagOutcome, VisionProvider,
};

/// Vision service wrapper with observability.
///
/// This wrapper validates requests, adds structured logging to any
/// [`VisionProvider`] and implements the higher-level operations built on
/// top of a single analysis call. The provider is wrapped in `Arc` for cheap
/// cloning.
#[derive(Clone)]
pub struct VisionService {
    inner: Arc<dyn VisionProvider>,
}

impl fmt::Debug for VisionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionService").finish_non_exhaustive()
    }
}

impl VisionService {
    /// Create a new vision service wrapper.
    pub fn new<P>(provider: P) -> Self
    where
        P: VisionProvider + 'static,
    {
        Self {
            inner: Arc::new(provider),
        }
    }

    /// Validates and runs a single analysis.
    ///
    /// Invalid requests never reach the provider.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        request.validate()?;

        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            image_url = %request.image_url,
            features = ?request.features(),
            aspect_ratios = ?request.aspect_ratios,
            "Analyzing image"
        );

        let result = self.inner.analyze(request).await;
        let elapsed = started_at.elapsed();

        match &result {
            Ok(analysis) => {
                tracing::debug!(
                    target: TRACING_TARGET,
                    image_url = %request.image_url,
                    sections = analysis.as_raw().len(),
                    elapsed_ms = elapsed.as_millis(),
                    "Image analyzed"
                );
            }
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    image_url = %request.image_url,
                    kind = %error.kind(),
                    error = %error,
                    elapsed_ms = elapsed.as_millis(),
                    "Image analysis failed"
                );
            }
        }

        result
    }

    /// Requests smart crop regions for the given aspect ratios.
    ///
    /// An empty ratio list lets the remote service pick a single ratio.
    pub async fn smart_crops(
        &self,
        image_url: Url,
        aspect_ratios: Vec<f64>,
    ) -> Result<Vec<CropRegion>> {
        let request = AnalyzeRequest::smart_crops(image_url, aspect_ratios);
        self.analyze(&request).await?.smart_crops()
    }

    /// Requests tags for one image and folds any failure into the outcome.
    pub async fn tag_outcome(&self, image_url: Url) -> TagOutcome {
        let request = AnalyzeRequest::tags(image_url);
        let tags = match self.analyze(&request).await {
            Ok(analysis) => analysis.tags(),
            Err(error) => Err(error),
        };

        match tags {
            Ok(tags) => TagOutcome::Tagged(tags),
            Err(error) => TagOutcome::failed(&error),
        }
    }

    /// Tags every image and groups the images by their top tag.
    ///
    /// At most `concurrency` analyses run at once. Outcomes are recorded in
    /// input order regardless of completion order, and a failing image never
    /// aborts the batch. Images still pending once `batch_timeout` has passed
    /// are recorded as timed out instead of delaying the whole batch.
    pub async fn categorize(
        &self,
        image_urls: Vec<Url>,
        concurrency: NonZeroUsize,
        batch_timeout: Duration,
    ) -> Categorization {
        let started_at = Instant::now();
        let deadline = tokio::time::Instant::now() + batch_timeout;
        let batch_size = image_urls.len();

        tracing::info!(
            target: TRACING_TARGET,
            batch_size,
            concurrency = concurrency.get(),
            batch_timeout_ms = batch_timeout.as_millis(),
            "Categorizing image batch"
        );

        let outcomes: Vec<(Url, TagOutcome)> = stream::iter(image_urls)
            .map(move |image_url| async move {
                let analysis = self.tag_outcome(image_url.clone());
                let outcome = match tokio::time::timeout_at(deadline, analysis).await {
                    Ok(outcome) => outcome,
                    Err(_) => {
                        tracing::warn!(
                            target: TRACING_TARGET,
                            image_url = %image_url,
                            "Batch deadline passed before the image was analyzed"
                        );
                        TagOutcome::failed(&Error::timeout(format!(
                            "batch deadline of {} ms exceeded",
                            batch_timeout.as_millis()
                        )))
                    }
                };
                (image_url, outcome)
            })
            .buffered(concurrency.get())
            .collect()
            .await;

        let mut categorization = Categorization::new();
        for (image_url, outcome) in outcomes {
            categorization.record(&image_url, outcome);
        }

        tracing::info!(
            target: TRACING_TARGET,
            batch_size,
            categories = categorization.category_map.len(),
            failed = categorization.failed_images.len(),
            elapsed_ms = started_at.elapsed().as_millis(),
            "Image batch categorized"
        );

        categorization
    }
}
