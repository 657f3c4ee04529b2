//! Batch categorization by top tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::Tag;

/// Failure reason recorded for an image whose analysis returned no tags.
pub const NO_TAGS_REASON: &str = "No tags returned by Azure.";

/// Images grouped by the name of their top tag.
pub type CategoryMap = BTreeMap<String, CategoryEntry>;

/// Failure reasons keyed by image URL.
pub type FailedImages = BTreeMap<String, String>;

/// Result of analyzing one image of a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum TagOutcome {
    /// The analysis succeeded and returned these tags.
    Tagged(Vec<Tag>),
    /// The analysis failed for the given reason.
    Failed(String),
}

impl TagOutcome {
    /// Creates the failure outcome for an analysis error.
    pub fn failed(error: &crate::Error) -> Self {
        Self::Failed(format!("Analysis failed: {error}"))
    }
}

/// Representative tag of a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct TopTag {
    /// Tag name, equal to the category key.
    pub name: String,
    /// Highest confidence seen for this tag among member images.
    pub confidence: f64,
}

/// A category and the images that belong to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct CategoryEntry {
    /// Representative tag of the category.
    pub top_tag: TopTag,
    /// Member image URLs in input order.
    pub urls: Vec<String>,
}

/// Accumulated outcome of a batch categorization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "schema", derive(schemars::JsonSchema))]
pub struct Categorization {
    /// Images grouped by top tag name.
    pub category_map: CategoryMap,
    /// Images that could not be categorized.
    pub failed_images: FailedImages,
}

impl Categorization {
    /// Creates an empty categorization.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome for one image.
    ///
    /// Outcomes must be recorded in input order: member lists follow the
    /// order of calls, and a later failure for a repeated URL replaces the
    /// earlier reason.
    pub fn record(&mut self, url: &Url, outcome: TagOutcome) {
        let tags = match outcome {
            TagOutcome::Tagged(tags) => tags,
            TagOutcome::Failed(reason) => {
                self.failed_images.insert(url.to_string(), reason);
                return;
            }
        };

        let Some(top) = top_tag(&tags) else {
            self.failed_images
                .insert(url.to_string(), NO_TAGS_REASON.to_owned());
            return;
        };

        match self.category_map.get_mut(&top.name) {
            Some(entry) => {
                entry.urls.push(url.to_string());
                if top.confidence > entry.top_tag.confidence {
                    entry.top_tag.confidence = top.confidence;
                }
            }
            None => {
                let entry = CategoryEntry {
                    top_tag: TopTag {
                        name: top.name.clone(),
                        confidence: top.confidence,
                    },
                    urls: vec![url.to_string()],
                };
                self.category_map.insert(top.name.clone(), entry);
            }
        }
    }

    /// Returns the number of categorized images.
    pub fn categorized_count(&self) -> usize {
        self.category_map.values().map(|e| e.urls.len()).sum()
    }
}

/// Returns the tag with the highest confidence.
///
/// Ties go to the tag that appears first.
pub fn top_tag(tags: &[Tag]) -> Option<&Tag> {
    tags.iter().fold(None, |best, tag| match best {
        Some(best) if tag.confidence <= best.confidence => Some(best),
        _ => Some(tag),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://images.example.com/{path}")).unwrap()
    }

    #[test]
    fn top_tag_prefers_first_on_ties() {
        let tags = vec![
            Tag::new("dog", 0.9),
            Tag::new("cat", 0.9),
            Tag::new("pet", 0.5),
        ];
        assert_eq!(top_tag(&tags).unwrap().name, "dog");
        assert!(top_tag(&[]).is_none());
    }

    #[test]
    fn groups_by_top_tag_and_keeps_max_confidence() {
        let mut result = Categorization::new();
        result.record(
            &url("a.jpg"),
            TagOutcome::Tagged(vec![Tag::new("cat", 0.9), Tag::new("pet", 0.5)]),
        );
        result.record(
            &url("b.jpg"),
            TagOutcome::Tagged(vec![Tag::new("dog", 0.8)]),
        );
        result.record(
            &url("c.jpg"),
            TagOutcome::Tagged(vec![Tag::new("cat", 0.95)]),
        );

        let cat = &result.category_map["cat"];
        assert_eq!(cat.top_tag.confidence, 0.95);
        assert_eq!(
            cat.urls,
            vec![
                "https://images.example.com/a.jpg",
                "https://images.example.com/c.jpg"
            ]
        );

        let dog = &result.category_map["dog"];
        assert_eq!(dog.top_tag.confidence, 0.8);
        assert_eq!(dog.urls, vec!["https://images.example.com/b.jpg"]);

        assert!(result.failed_images.is_empty());
        assert_eq!(result.categorized_count(), 3);
    }

    #[test]
    fn empty_tags_and_failures_are_recorded() {
        let mut result = Categorization::new();
        result.record(&url("empty.jpg"), TagOutcome::Tagged(Vec::new()));
        result.record(
            &url("broken.jpg"),
            TagOutcome::Failed("Analysis failed: boom".to_owned()),
        );

        assert!(result.category_map.is_empty());
        assert_eq!(
            result.failed_images["https://images.example.com/empty.jpg"],
            NO_TAGS_REASON
        );
        assert_eq!(
            result.failed_images["https://images.example.com/broken.jpg"],
            "Analysis failed: boom"
        );
    }

    #[test]
    fn repeated_urls_are_listed_twice() {
        let mut result = Categorization::new();
        let image = url("a.jpg");
        result.record(&image, TagOutcome::Tagged(vec![Tag::new("cat", 0.7)]));
        result.record(&image, TagOutcome::Tagged(vec![Tag::new("cat", 0.7)]));

        assert_eq!(result.category_map["cat"].urls.len(), 2);
    }

    #[test]
    fn repeated_failures_keep_the_last_reason() {
        let mut result = Categorization::new();
        let image = url("a.jpg");
        result.record(&image, TagOutcome::Failed("first".to_owned()));
        result.record(&image, TagOutcome::Failed("second".to_owned()));

        assert_eq!(result.failed_images.len(), 1);
        assert_eq!(result.failed_images[image.as_str()], "second");
    }

    #[test]
    fn equal_confidence_does_not_replace() {
        let mut result = Categorization::new();
        result.record(&url("a.jpg"), TagOutcome::Tagged(vec![Tag::new("cat", 0.8)]));
        result.record(&url("b.jpg"), TagOutcome::Tagged(vec![Tag::new("cat", 0.8)]));
        assert_eq!(result.category_map["cat"].top_tag.confidence, 0.8);
    }
}
