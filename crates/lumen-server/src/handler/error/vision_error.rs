//! Mapping of vision errors onto HTTP errors.

use lumen_vision::ErrorKind as VisionErrorKind;

use super::{Error, ErrorKind};

/// The remote operation a handler was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCall {
    /// A general image analysis call.
    ImageAnalysis,
    /// A smart cropping call.
    SmartCropping,
}

impl RemoteCall {
    /// Maps a vision error raised by this call to an HTTP error.
    ///
    /// Input errors keep their message as the detail, remote failures become
    /// 503 responses naming the failed service, and anything else is an
    /// unexpected 500.
    pub fn into_error(self, error: lumen_vision::Error) -> Error<'static> {
        let kind = error.kind();

        match kind {
            VisionErrorKind::InvalidInput => {
                ErrorKind::BadRequest.with_message(error.message.into_owned())
            }
            VisionErrorKind::NotConfigured => {
                ErrorKind::NotConfigured.with_context(error.message.into_owned())
            }
            _ if kind.is_unavailable() => {
                let message = match self {
                    Self::ImageAnalysis => format!(
                        "Azure Image Analysis service call failed: {error}. Check URL and feature validity."
                    ),
                    Self::SmartCropping => {
                        format!("Azure Smart Cropping service call failed: {error}")
                    }
                };

                ErrorKind::ServiceUnavailable
                    .with_message(message)
                    .with_context(kind.to_string())
            }
            _ => ErrorKind::InternalServerError
                .with_message(format!("An unexpected server error occurred: {error}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use lumen_vision::Error as VisionError;

    use super::*;

    #[test]
    fn input_errors_keep_their_message() {
        let error = RemoteCall::SmartCropping.into_error(VisionError::invalid_input("bad ratio"));
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert_eq!(error.message(), Some("bad ratio"));
    }

    #[test]
    fn remote_failures_name_the_service() {
        let error = RemoteCall::ImageAnalysis.into_error(VisionError::timeout("timed out"));
        assert_eq!(error.kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(
            error.message(),
            Some(
                "Azure Image Analysis service call failed: timed out. Check URL and feature validity."
            )
        );

        let error =
            RemoteCall::SmartCropping.into_error(VisionError::service_unavailable("refused"));
        assert_eq!(
            error.message(),
            Some("Azure Smart Cropping service call failed: refused")
        );
    }

    #[test]
    fn other_failures_are_unexpected() {
        let error = RemoteCall::ImageAnalysis.into_error(VisionError::internal("boom"));
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        assert_eq!(
            error.message(),
            Some("An unexpected server error occurred: boom")
        );

        let error = RemoteCall::ImageAnalysis.into_error(VisionError::not_configured("no key"));
        assert_eq!(error.kind(), ErrorKind::NotConfigured);
        assert_eq!(error.message(), None);
    }
}
