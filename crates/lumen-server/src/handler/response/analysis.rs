//! Analysis response types.

use lumen_vision::{AnalysisResult, Categorization, CropRegion};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Envelope wrapping every successful analysis payload.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(rename = "{T}Envelope")]
pub struct Envelope<T> {
    /// The analysis payload.
    pub result: T,
}

impl<T> Envelope<T> {
    /// Wraps a payload.
    pub fn new(result: T) -> Self {
        Self { result }
    }
}

/// Crop regions computed for an image, in remote order.
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CropRegions {
    /// One region per returned aspect ratio.
    pub crop_regions: Vec<CropRegion>,
}

impl From<Vec<CropRegion>> for CropRegions {
    fn from(crop_regions: Vec<CropRegion>) -> Self {
        Self { crop_regions }
    }
}

/// Raw analysis output passed through from the remote service.
pub type ImageAnalysis = Envelope<AnalysisResult>;

/// Smart crop regions.
pub type CropAnalysis = Envelope<CropRegions>;

/// Batch categorization outcome.
pub type BatchCategorization = Envelope<Categorization>;
