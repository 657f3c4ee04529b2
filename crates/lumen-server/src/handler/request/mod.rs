//! Request types for HTTP handlers.

mod analysis;
mod categorize;
mod validations;

pub use analysis::{AnalyzeImage, CropAreaOfInterest};
pub use categorize::CategorizeBatch;
