#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod category;
mod error;
mod feature;
mod service;

pub mod request;
pub mod response;

#[cfg(feature = "azure")]
#[cfg_attr(docsrs, doc(cfg(feature = "azure")))]
pub mod azure;

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub mod mock;

pub use category::{
    CategoryEntry, CategoryMap, Categorization, FailedImages, NO_TAGS_REASON, TagOutcome,
    TopTag, top_tag,
};
pub use error::{BoxedError, Error, ErrorKind, Result};
pub use feature::VisualFeature;
pub use request::AnalyzeRequest;
pub use response::{AnalysisResult, BoundingBox, CropRegion, Tag};
pub use service::VisionService;

/// Tracing target for vision operations.
pub const TRACING_TARGET: &str = "lumen_vision::service";

/// Core trait for image analysis backends.
///
/// Implement this trait to plug a remote vision service into [`VisionService`].
#[async_trait::async_trait]
pub trait VisionProvider: Send + Sync {
    /// Analyzes a single image and returns the raw result tree.
    ///
    /// The request has already been validated by [`VisionService`].
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult>;
}
