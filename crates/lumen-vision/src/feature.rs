//! Visual features understood by the analysis service.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// A named kind of visual analysis.
///
/// Wire names are the upper snake case variant names (`"TAGS"`,
/// `"DENSE_CAPTIONS"`, ...) and are matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualFeature {
    /// Content tags for recognizable objects, scenery and actions.
    Tags,
    /// A one-sentence caption describing the image.
    Caption,
    /// Bounding boxes of detected objects.
    Objects,
    /// Captions for up to ten regions of the image.
    DenseCaptions,
    /// Bounding boxes of detected people.
    People,
    /// Suggested crop regions for the requested aspect ratios.
    SmartCrops,
    /// Printed and handwritten text (OCR).
    Read,
}

impl VisualFeature {
    /// Identifier of this feature in the remote `features` query parameter.
    pub const fn remote_name(self) -> &'static str {
        match self {
            Self::Tags => "tags",
            Self::Caption => "caption",
            Self::Objects => "objects",
            Self::DenseCaptions => "denseCaptions",
            Self::People => "people",
            Self::SmartCrops => "smartCrops",
            Self::Read => "read",
        }
    }

    /// Features requested when the caller does not name any.
    pub fn defaults() -> Vec<Self> {
        vec![Self::Tags, Self::Caption]
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn parses_wire_names_exactly() {
        assert_eq!(VisualFeature::from_str("TAGS").unwrap(), VisualFeature::Tags);
        assert_eq!(
            VisualFeature::from_str("DENSE_CAPTIONS").unwrap(),
            VisualFeature::DenseCaptions
        );
        assert_eq!(
            VisualFeature::from_str("SMART_CROPS").unwrap(),
            VisualFeature::SmartCrops
        );

        assert!(VisualFeature::from_str("tags").is_err());
        assert!(VisualFeature::from_str("FOO").is_err());
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(VisualFeature::DenseCaptions.to_string(), "DENSE_CAPTIONS");
        assert_eq!(
            serde_json::to_string(&VisualFeature::SmartCrops).unwrap(),
            "\"SMART_CROPS\""
        );
    }

    #[test]
    fn remote_names_are_distinct() {
        let names: HashSet<_> = VisualFeature::iter().map(VisualFeature::remote_name).collect();
        assert_eq!(names.len(), VisualFeature::iter().count());
    }
}
