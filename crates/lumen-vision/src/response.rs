//! Image analysis response types.
//!
//! The remote result is kept as the raw JSON object returned by the service.
//! Typed views are parsed on demand for the parts the server interprets.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{Error, Result};

/// Raw analysis result as returned by the remote service.
///
/// Keys use the remote naming (`modelVersion`, `captionResult`,
/// `tagsResult`, ...) and are passed through to clients untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(transparent)]
pub struct AnalysisResult(Map<String, Value>);

impl AnalysisResult {
    /// Wraps a raw JSON object.
    pub fn new(raw: Map<String, Value>) -> Self {
        Self(raw)
    }

    /// Parses a raw JSON value, which must be an object.
    ///
    /// # Errors
    ///
    /// Returns a [`Serialization`](crate::ErrorKind::Serialization) error for
    /// any other JSON value.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(raw) => Ok(Self(raw)),
            other => Err(Error::serialization(format!(
                "unexpected response structure: expected an object, got {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Returns the raw JSON object.
    pub fn as_raw(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns the tags of the result.
    ///
    /// A result without a `tagsResult` section yields no tags.
    ///
    /// # Errors
    ///
    /// Returns a [`Serialization`](crate::ErrorKind::Serialization) error
    /// when the section is present but malformed.
    pub fn tags(&self) -> Result<Vec<Tag>> {
        self.section::<RawTag>("tagsResult")
            .map(|tags| tags.into_iter().map(Tag::from).collect())
    }

    /// Returns the smart crop regions of the result, in remote order.
    ///
    /// # Errors
    ///
    /// Returns a [`Serialization`](crate::ErrorKind::Serialization) error
    /// when the section is present but malformed.
    pub fn smart_crops(&self) -> Result<Vec<CropRegion>> {
        self.section::<RawCropRegion>("smartCropsResult")
            .map(|crops| crops.into_iter().map(CropRegion::from).collect())
    }

    fn section<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: for<'de> Deserialize<'de>,
    {
        let Some(section) = self.0.get(key) else {
            return Ok(Vec::new());
        };

        // A null section or null value list means nothing was detected.
        let section: Option<RawSection<T>> = serde_json::from_value(section.clone())?;
        Ok(section.and_then(|section| section.values).unwrap_or_default())
    }
}

impl From<Map<String, Value>> for AnalysisResult {
    fn from(raw: Map<String, Value>) -> Self {
        Self(raw)
    }
}

/// A content tag with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Tag {
    /// Tag name, e.g. `"cat"`.
    pub name: String,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
}

impl Tag {
    /// Creates a new tag.
    pub fn new(name: impl Into<String>, confidence: f64) -> Self {
        Self {
            name: name.into(),
            confidence,
        }
    }
}

/// A suggested crop region for one requested aspect ratio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct CropRegion {
    /// Aspect ratio (width / height) the remote service settled on.
    pub aspect_ratio: f64,
    /// Region in pixel coordinates of the original image.
    pub bounding_box: BoundingBox,
}

/// Pixel rectangle within an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct BoundingBox {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct RawSection<T> {
    #[serde(default)]
    values: Option<Vec<T>>,
}

#[derive(Deserialize)]
struct RawTag {
    name: String,
    confidence: f64,
}

impl From<RawTag> for Tag {
    fn from(raw: RawTag) -> Self {
        Self::new(raw.name, raw.confidence)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCropRegion {
    aspect_ratio: f64,
    bounding_box: RawBoundingBox,
}

#[derive(Deserialize)]
struct RawBoundingBox {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl From<RawCropRegion> for CropRegion {
    fn from(raw: RawCropRegion) -> Self {
        let RawBoundingBox { x, y, w, h } = raw.bounding_box;
        Self {
            aspect_ratio: raw.aspect_ratio,
            bounding_box: BoundingBox {
                x,
                y,
                width: w,
                height: h,
            },
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
