//! Error types for the Azure AI Vision client.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for Azure client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Azure client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed before a response arrived.
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("Azure responded with {status}: {detail}")]
    Status {
        /// HTTP status returned by the service.
        status: StatusCode,
        /// Error code and message from the body, or the raw body.
        detail: String,
    },
    /// The success body could not be interpreted.
    #[error("unexpected response structure: {0}")]
    Serde(#[from] serde_json::Error),
}

impl Error {
    /// Builds a status error from a non-success response body.
    pub(crate) fn from_status(status: StatusCode, body: &str) -> Self {
        let detail = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(ErrorEnvelope { error }) => format!("{}: {}", error.code, error.message),
            Err(_) if body.trim().is_empty() => status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_owned(),
            Err(_) => body.trim().to_owned(),
        };

        Self::Status { status, detail }
    }
}

/// Error envelope returned by Azure AI services.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::Reqwest(e) if e.is_timeout() => crate::Error::timeout(message).with_source(e),
            Error::Reqwest(e) if e.is_connect() => {
                crate::Error::service_unavailable(format!("connection failed: {message}"))
                    .with_source(e)
            }
            Error::Reqwest(e) => crate::Error::service_unavailable(message).with_source(e),
            Error::Status { .. } => crate::Error::service_unavailable(message),
            Error::Serde(e) => crate::Error::serialization(message).with_source(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn status_errors_use_the_azure_envelope() {
        let body = r#"{"error":{"code":"InvalidRequest","message":"Image URL is badly formatted."}}"#;
        let error = Error::from_status(StatusCode::BAD_REQUEST, body);

        assert_eq!(
            error.to_string(),
            "Azure responded with 400 Bad Request: InvalidRequest: Image URL is badly formatted."
        );

        let error = crate::Error::from(error);
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
    }

    #[test]
    fn status_errors_fall_back_to_the_raw_body() {
        let error = Error::from_status(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(
            error.to_string(),
            "Azure responded with 502 Bad Gateway: upstream exploded"
        );

        let error = Error::from_status(StatusCode::SERVICE_UNAVAILABLE, "");
        assert_eq!(
            error.to_string(),
            "Azure responded with 503 Service Unavailable: Service Unavailable"
        );
    }

    #[test]
    fn serde_errors_are_serialization() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error = crate::Error::from(Error::from(json_error));
        assert_eq!(error.kind(), ErrorKind::Serialization);
    }
}
