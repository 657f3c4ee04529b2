use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// HTTP error response body.
///
/// Every non-2xx response of the API carries this body. The `detail` is
/// safe for client display; `context` is kept for logs only.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse<'a> {
    /// Human-readable description of the failure.
    pub detail: Cow<'a, str>,
    /// Stable machine-readable error code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<Cow<'a, str>>,

    /// Internal context for debugging (not exposed to client)
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code (not serialized in JSON)
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new(
        "Invalid request data.",
        "INVALID_INPUT",
        StatusCode::BAD_REQUEST,
    );
    pub const NOT_FOUND: Self = Self::new("Not Found", "NOT_FOUND", StatusCode::NOT_FOUND);

    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "Internal server error.",
        "INTERNAL_SERVER_ERROR",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_CONFIGURED: Self = Self::new(
        "Azure client not initialized. Check AZURE_ENDPOINT and AZURE_KEY configuration.",
        "NOT_CONFIGURED",
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const SERVICE_UNAVAILABLE: Self = Self::new(
        "Service unavailable.",
        "SERVICE_UNAVAILABLE",
        StatusCode::SERVICE_UNAVAILABLE,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(detail: &'a str, error_code: &'a str, status: StatusCode) -> Self {
        Self {
            detail: Cow::Borrowed(detail),
            error_code: Some(Cow::Borrowed(error_code)),
            context: None,
            status,
        }
    }

    /// Replaces the default detail with a specific one.
    pub fn with_detail(mut self, detail: impl Into<Cow<'a, str>>) -> Self {
        self.detail = detail.into();
        self
    }

    /// Attaches context to the error response.
    /// If context already exists, it merges them with a separator.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    fn into_response(self) -> Response {
        let error_code = self.error_code.as_deref().unwrap_or_default();
        if self.status.is_server_error() {
            tracing::error!(
                status = %self.status,
                error_code = %error_code,
                detail = %self.detail,
                context = ?self.context,
                "HTTP error response"
            );
        } else {
            tracing::warn!(
                status = %self.status,
                error_code = %error_code,
                detail = %self.detail,
                context = ?self.context,
                "HTTP error response"
            );
        }

        (self.status, Json(self)).into_response()
    }
}
