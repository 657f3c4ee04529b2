//! Reqwest-based client for the Azure AI Vision Image Analysis REST API.

use std::sync::Arc;

use reqwest::Client;
use serde_json::{Value, json};
use url::Url;

use super::{AzureConfig, Error, TRACING_TARGET};
use crate::{AnalysisResult, AnalyzeRequest, VisionProvider, VisionService};

/// Header carrying the subscription key.
const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Inner client that holds the HTTP client and resolved settings.
struct AzureClientInner {
    http: Client,
    config: AzureConfig,
    analyze_url: Url,
    key: String,
}

/// Client for the Azure AI Vision Image Analysis service.
///
/// This client implements the [`VisionProvider`] trait. One client is built
/// at startup and shared by every request.
///
/// # Examples
///
/// ```rust,ignore
/// use lumen_vision::azure::{AzureClient, AzureConfig};
///
/// let config = AzureConfig::new("https://my-resource.cognitiveservices.azure.com", key);
/// let service = AzureClient::new(config)?.into_service();
/// ```
#[derive(Clone)]
pub struct AzureClient {
    inner: Arc<AzureClientInner>,
}

impl std::fmt::Debug for AzureClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureClient")
            .field("analyze_url", &self.inner.analyze_url.as_str())
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl AzureClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`NotConfigured`](crate::ErrorKind::NotConfigured) error
    /// when the endpoint or key is missing or invalid, and an
    /// [`Internal`](crate::ErrorKind::Internal) error when the HTTP client
    /// cannot be built.
    pub fn new(config: AzureConfig) -> crate::Result<Self> {
        let key = config
            .key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| crate::Error::not_configured("Azure key is not set."))?
            .to_owned();

        let analyze_url = analyze_url(config.endpoint_url()?)?;
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            analyze_url = %analyze_url,
            api_version = %config.api_version,
            timeout_ms = timeout.as_millis(),
            "Creating Azure vision client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| crate::Error::internal("failed to create HTTP client").with_source(e))?;

        let inner = AzureClientInner {
            http,
            config,
            analyze_url,
            key,
        };

        tracing::info!(
            target: TRACING_TARGET,
            endpoint = %inner.analyze_url.origin().ascii_serialization(),
            "Azure vision client created"
        );

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &AzureConfig {
        &self.inner.config
    }

    /// Converts this client into a [`VisionService`] for use with dependency injection.
    pub fn into_service(self) -> VisionService {
        VisionService::new(self)
    }

    /// Builds the full request URL, including the query string, for a request.
    pub fn request_url(&self, request: &AnalyzeRequest) -> Url {
        let features = request
            .features()
            .iter()
            .map(|feature| feature.remote_name())
            .collect::<Vec<_>>()
            .join(",");

        let mut url = self.inner.analyze_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", &self.inner.config.api_version);
            query.append_pair("features", &features);

            if !request.aspect_ratios.is_empty() {
                let ratios = request
                    .aspect_ratios
                    .iter()
                    .map(f64::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                query.append_pair("smartcrops-aspect-ratios", &ratios);
            }
        }

        url
    }

    async fn send(&self, request: &AnalyzeRequest) -> Result<Value, Error> {
        let response = self
            .inner
            .http
            .post(self.request_url(request))
            .header(SUBSCRIPTION_KEY_HEADER, &self.inner.key)
            .json(&json!({ "url": request.image_url.as_str() }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::from_status(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait::async_trait]
impl VisionProvider for AzureClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> crate::Result<AnalysisResult> {
        tracing::trace!(
            target: TRACING_TARGET,
            image_url = %request.image_url,
            "Sending Image Analysis request"
        );

        let body = self.send(request).await?;
        AnalysisResult::from_value(body)
    }
}

/// Appends the Image Analysis route to the resource endpoint.
fn analyze_url(mut endpoint: Url) -> crate::Result<Url> {
    endpoint.set_query(None);
    endpoint.set_fragment(None);

    endpoint
        .path_segments_mut()
        .map_err(|()| crate::Error::not_configured("Azure endpoint cannot be a base URL."))?
        .pop_if_empty()
        .extend(["computervision", "imageanalysis:analyze"]);

    Ok(endpoint)
}
