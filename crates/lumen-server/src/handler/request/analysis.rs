//! Single-image analysis request types.

use std::str::FromStr;

use lumen_vision::request::{DEFAULT_ASPECT_RATIOS, NO_FEATURES_MESSAGE};
use lumen_vision::{AnalyzeRequest, VisualFeature};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use super::validations::{is_http_url, parse_http_url};
use crate::handler::{ErrorKind, Result};

/// Request payload for analyzing a single image.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct AnalyzeImage {
    /// Publicly reachable URL of the image.
    #[validate(custom(function = "is_http_url"))]
    #[schemars(example = "https://upload.wikimedia.org/wikipedia/commons/6/68/Akha_cropped_hires.JPG")]
    pub image_url: String,
    /// Visual features to extract.
    ///
    /// One or more of `TAGS`, `CAPTION`, `OBJECTS`, `DENSE_CAPTIONS`,
    /// `PEOPLE`, `SMART_CROPS` and `READ`. Defaults to `["TAGS", "CAPTION"]`.
    #[serde(default)]
    #[schemars(example = ["TAGS", "CAPTION", "OBJECTS"])]
    pub features: Option<Vec<String>>,
}

impl AnalyzeImage {
    /// Converts this request into an [`AnalyzeRequest`].
    ///
    /// Every feature name must be known; an unknown name rejects the whole
    /// request instead of being dropped.
    pub fn into_request(self) -> Result<AnalyzeRequest> {
        let image_url = image_url(&self.image_url)?;

        let features = match self.features {
            None => VisualFeature::defaults(),
            Some(names) => names
                .iter()
                .map(|name| parse_feature(name))
                .collect::<Result<Vec<_>>>()?,
        };

        if features.is_empty() {
            return Err(ErrorKind::BadRequest.with_message(NO_FEATURES_MESSAGE));
        }

        Ok(AnalyzeRequest::new(image_url, features))
    }
}

/// Request payload for computing smart crop regions.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Validate)]
pub struct CropAreaOfInterest {
    /// Publicly reachable URL of the image.
    #[validate(custom(function = "is_http_url"))]
    #[schemars(example = "https://upload.wikimedia.org/wikipedia/commons/6/68/Akha_cropped_hires.JPG")]
    pub image_url: String,
    /// Target aspect ratios (width / height), each within `[0.75, 1.8]`.
    ///
    /// Defaults to `[0.9, 1.33, 1.0]`.
    #[serde(default)]
    #[schemars(example = [0.9, 1.33, 1.0])]
    pub aspect_ratios: Option<Vec<f64>>,
}

impl CropAreaOfInterest {
    /// Returns the image URL and the requested or default aspect ratios.
    pub fn into_parts(self) -> Result<(Url, Vec<f64>)> {
        let image_url = image_url(&self.image_url)?;
        let aspect_ratios = self
            .aspect_ratios
            .unwrap_or_else(|| DEFAULT_ASPECT_RATIOS.to_vec());

        Ok((image_url, aspect_ratios))
    }
}

fn parse_feature(name: &str) -> Result<VisualFeature> {
    VisualFeature::from_str(name).map_err(|_| {
        ErrorKind::BadRequest.with_message(format!(
            "Invalid visual feature name provided: '{name}'."
        ))
    })
}

pub(super) fn image_url(input: &str) -> Result<Url> {
    parse_http_url(input).ok_or_else(|| {
        ErrorKind::BadRequest.with_message(format!(
            "Invalid image URL '{input}'. Must be an absolute http or https URL."
        ))
    })
}
