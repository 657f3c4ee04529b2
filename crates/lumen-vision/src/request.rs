//! Image analysis request types.

use url::Url;

use crate::{Error, Result, VisualFeature};

/// Message used when no feature survives validation.
pub const NO_FEATURES_MESSAGE: &str = "No valid visual features specified. Must be one or more.";

/// Smallest aspect ratio accepted for smart cropping.
pub const MIN_ASPECT_RATIO: f64 = 0.75;

/// Largest aspect ratio accepted for smart cropping.
pub const MAX_ASPECT_RATIO: f64 = 1.8;

/// Aspect ratios used when a crop request does not name any.
pub const DEFAULT_ASPECT_RATIOS: [f64; 3] = [0.9, 1.33, 1.0];

/// A single image analysis request.
///
/// Features behave like an ordered set: duplicates are dropped on insertion
/// and the first occurrence keeps its position.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    /// The publicly reachable image URL.
    pub image_url: Url,
    /// Requested features, without duplicates.
    features: Vec<VisualFeature>,
    /// Aspect ratios for smart cropping, in caller order.
    pub aspect_ratios: Vec<f64>,
}

impl AnalyzeRequest {
    /// Creates a request for the given image and features.
    pub fn new(image_url: Url, features: impl IntoIterator<Item = VisualFeature>) -> Self {
        let mut request = Self {
            image_url,
            features: Vec::new(),
            aspect_ratios: Vec::new(),
        };

        for feature in features {
            request.push_feature(feature);
        }

        request
    }

    /// Creates a request for tags only.
    pub fn tags(image_url: Url) -> Self {
        Self::new(image_url, [VisualFeature::Tags])
    }

    /// Creates a smart cropping request for the given aspect ratios.
    pub fn smart_crops(image_url: Url, aspect_ratios: impl Into<Vec<f64>>) -> Self {
        Self::new(image_url, [VisualFeature::SmartCrops]).with_aspect_ratios(aspect_ratios)
    }

    /// Sets the smart cropping aspect ratios.
    #[must_use]
    pub fn with_aspect_ratios(mut self, aspect_ratios: impl Into<Vec<f64>>) -> Self {
        self.aspect_ratios = aspect_ratios.into();
        self
    }

    /// Adds a feature unless it is already present.
    pub fn push_feature(&mut self, feature: VisualFeature) {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
    }

    /// Returns the requested features.
    pub fn features(&self) -> &[VisualFeature] {
        &self.features
    }

    /// Returns `true` if the feature was requested.
    pub fn has_feature(&self, feature: VisualFeature) -> bool {
        self.features.contains(&feature)
    }

    /// Checks the request before it is sent anywhere.
    ///
    /// # Errors
    ///
    /// Returns an [`InvalidInput`] error when the URL is not an absolute
    /// `http`/`https` URL with a host, when no feature is requested, or when
    /// aspect ratios are given without [`VisualFeature::SmartCrops`] or fall
    /// outside `[0.75, 1.8]`.
    ///
    /// [`InvalidInput`]: crate::ErrorKind::InvalidInput
    pub fn validate(&self) -> Result<()> {
        validate_image_url(&self.image_url)?;

        if self.features.is_empty() {
            return Err(Error::invalid_input(NO_FEATURES_MESSAGE));
        }

        if !self.aspect_ratios.is_empty() && !self.has_feature(VisualFeature::SmartCrops) {
            return Err(Error::invalid_input(
                "Aspect ratios can only be specified together with SMART_CROPS.",
            ));
        }

        validate_aspect_ratios(&self.aspect_ratios)
    }
}

/// Checks that every aspect ratio lies within `[0.75, 1.8]`.
///
/// # Errors
///
/// Returns an [`InvalidInput`](crate::ErrorKind::InvalidInput) error listing
/// every offending ratio in input order.
pub fn validate_aspect_ratios(aspect_ratios: &[f64]) -> Result<()> {
    let invalid: Vec<f64> = aspect_ratios
        .iter()
        .copied()
        .filter(|ratio| !(MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(ratio))
        .collect();

    if invalid.is_empty() {
        return Ok(());
    }

    Err(Error::invalid_input(format!(
        "Invalid aspect ratios {invalid:?}. Each aspect ratio must be between \
         {MIN_ASPECT_RATIO} and {MAX_ASPECT_RATIO} inclusive."
    )))
}

/// Checks that a URL is an absolute `http` or `https` URL with a host.
///
/// # Errors
///
/// Returns an [`InvalidInput`](crate::ErrorKind::InvalidInput) error otherwise.
pub fn validate_image_url(url: &Url) -> Result<()> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_input(format!(
            "Image URL must use http or https, got '{}'.",
            url.scheme()
        )));
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_input("Image URL must include a host."));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn image() -> Url {
        Url::parse("https://example.com/cat.jpg").unwrap()
    }

    #[test]
    fn duplicate_features_collapse() {
        let request = AnalyzeRequest::new(
            image(),
            [
                VisualFeature::Caption,
                VisualFeature::Tags,
                VisualFeature::Caption,
            ],
        );

        assert_eq!(
            request.features(),
            &[VisualFeature::Caption, VisualFeature::Tags]
        );
        assert!(request.validate().is_ok());
    }

    #[test]
    fn empty_features_are_rejected() {
        let request = AnalyzeRequest::new(image(), []);
        let error = request.validate().unwrap_err();

        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(error.to_string(), NO_FEATURES_MESSAGE);
    }

    #[test]
    fn aspect_ratios_require_smart_crops() {
        let request = AnalyzeRequest::tags(image()).with_aspect_ratios(vec![1.0]);
        assert_eq!(
            request.validate().unwrap_err().kind(),
            ErrorKind::InvalidInput
        );

        let request = AnalyzeRequest::smart_crops(image(), vec![1.0, 1.33]);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn aspect_ratio_bounds_are_inclusive() {
        assert!(validate_aspect_ratios(&[0.75, 1.8]).is_ok());
        assert!(validate_aspect_ratios(&[]).is_ok());
        assert!(validate_aspect_ratios(&DEFAULT_ASPECT_RATIOS).is_ok());
        assert!(validate_aspect_ratios(&[f64::NAN]).is_err());
    }

    #[test]
    fn out_of_range_ratios_are_listed() {
        let error = validate_aspect_ratios(&[0.5, 1.0, 2.0]).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            error.to_string(),
            "Invalid aspect ratios [0.5, 2.0]. Each aspect ratio must be between 0.75 and 1.8 inclusive."
        );

        let error = validate_aspect_ratios(&[0.5, 1.0]).unwrap_err();
        assert!(error.to_string().starts_with("Invalid aspect ratios [0.5]."));
    }

    #[test]
    fn non_http_urls_are_rejected() {
        let ftp = Url::parse("ftp://example.com/cat.jpg").unwrap();
        assert!(validate_image_url(&ftp).is_err());

        let data = Url::parse("data:image/png;base64,AAAA").unwrap();
        assert!(validate_image_url(&data).is_err());

        assert!(validate_image_url(&image()).is_ok());
    }
}
