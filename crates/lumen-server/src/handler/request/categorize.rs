//! Batch categorization request types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use super::analysis::image_url;
use super::validations::are_http_urls;
use crate::handler::Result;

/// Request payload for categorizing a batch of images.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct CategorizeBatch {
    /// Publicly reachable image URLs. Duplicates are allowed.
    #[validate(custom(function = "are_http_urls"))]
    #[schemars(example = [
        "https://content.eol.org/data/media/be/2e/10/30.324afcc0ad71720c4346a9b46bbaa7e0.jpg",
        "https://upload.wikimedia.org/wikipedia/commons/6/68/Akha_cropped_hires.JPG",
    ])]
    pub image_urls: Vec<String>,
}

impl CategorizeBatch {
    /// Parses every image URL, keeping input order.
    pub fn into_urls(self) -> Result<Vec<Url>> {
        self.image_urls.iter().map(|url| image_url(url)).collect()
    }
}
