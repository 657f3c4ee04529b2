//! Request extractors with improved error handling and validation.
//!
//! - [`Json`] - JSON deserialization with descriptive 400 responses
//! - [`ValidateJson`] - JSON extraction with automatic validation
//! - [`Vision`] - the configured vision service, or a `NOT_CONFIGURED` error

pub mod reject;
mod vision;

pub use crate::extract::reject::{Json, ValidateJson};
pub use crate::extract::vision::Vision;
