//! Scripted vision provider for testing.
//!
//! This module is only available when the `test-utils` feature is enabled:
//!
//! ```toml
//! [dev-dependencies]
//! lumen-vision = { version = "...", features = ["test-utils"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use lumen_vision::mock::MockProvider;
//! use lumen_vision::{Tag, VisionService};
//!
//! let provider = MockProvider::new()
//!     .with_tags(url.clone(), vec![Tag::new("cat", 0.9)]);
//! let service = provider.clone().into_service();
//!
//! let outcome = service.tag_outcome(url).await;
//! assert_eq!(provider.calls().len(), 1);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::{Map, Value, json};
use url::Url;

use crate::{
    AnalysisResult, AnalyzeRequest, Error, ErrorKind, Result, Tag, VisionProvider, VisionService,
};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(Value),
    Fail(ErrorKind, Cow<'static, str>),
}

#[derive(Debug, Default)]
struct MockState {
    scripts: HashMap<String, Scripted>,
    calls: Vec<AnalyzeRequest>,
    latency: Duration,
}

/// Vision provider that answers from per-URL scripts and records every call.
///
/// URLs without a script receive a result with no analysis sections.
#[derive(Debug, Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<MockState>>,
}

impl MockProvider {
    /// Creates a provider without any scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests for `image_url` with the given raw JSON.
    #[must_use]
    pub fn with_response(self, image_url: Url, raw: Value) -> Self {
        self.script(image_url, Scripted::Respond(raw))
    }

    /// Answers requests for `image_url` with a result holding these tags.
    #[must_use]
    pub fn with_tags(self, image_url: Url, tags: Vec<Tag>) -> Self {
        let raw = json!({
            "modelVersion": "2023-10-01",
            "tagsResult": { "values": tags },
        });

        self.with_response(image_url, raw)
    }

    /// Fails requests for `image_url` with an error of the same kind and message.
    #[must_use]
    pub fn with_failure(self, image_url: Url, error: Error) -> Self {
        self.script(image_url, Scripted::Fail(error.kind, error.message))
    }

    /// Delays every answer by `latency`, like a slow remote service.
    #[must_use]
    pub fn with_latency(self, latency: Duration) -> Self {
        self.lock().latency = latency;
        self
    }

    /// Returns every request received so far, in arrival order.
    pub fn calls(&self) -> Vec<AnalyzeRequest> {
        self.lock().calls.clone()
    }

    /// Converts this provider into a [`VisionService`].
    pub fn into_service(self) -> VisionService {
        VisionService::new(self)
    }

    fn script(self, image_url: Url, scripted: Scripted) -> Self {
        self.lock().scripts.insert(image_url.into(), scripted);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait::async_trait]
impl VisionProvider for MockProvider {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResult> {
        let (scripted, latency) = {
            let mut state = self.lock();
            state.calls.push(request.clone());
            let scripted = state.scripts.get(request.image_url.as_str()).cloned();
            (scripted, state.latency)
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        match scripted {
            Some(Scripted::Respond(raw)) => AnalysisResult::from_value(raw),
            Some(Scripted::Fail(kind, message)) => Err(Error::new(kind, message)),
            None => {
                let mut raw = Map::new();
                raw.insert("modelVersion".into(), Value::from("2023-10-01"));
                Ok(AnalysisResult::new(raw))
            }
        }
    }
}
