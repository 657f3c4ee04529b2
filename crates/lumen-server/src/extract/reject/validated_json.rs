//! Validated JSON extractor with automatic validation.
//!
//! This module provides [`ValidateJson`], an enhanced JSON extractor that
//! combines deserialization with automatic validation using the `validator` crate.

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

/// Enhanced JSON extractor with automatic validation using the `validator` crate.
///
/// Also see [`Json`].
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Creates a new instance of [`ValidateJson`].
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;

        data.validate()?;
        Ok(Self::new(data))
    }
}

/// Formats a single validation error.
///
/// Custom messages are used verbatim so request types control the detail.
fn format_validation_error(field: &str, error: &validator::ValidationError) -> String {
    if let Some(custom_message) = &error.message {
        return custom_message.to_string();
    }

    let message = match error.code.as_ref() {
        "required" => "is required and cannot be empty".to_string(),
        "url" => "must be a valid URL (e.g., https://example.com/image.jpg)".to_string(),
        "length" => "has invalid length".to_string(),
        "range" => "is out of valid range".to_string(),
        code => format!("failed validation: {}", code),
    };

    format!("Field '{}' {}.", field, message)
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut error_messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(field, error))
            })
            .collect();

        // Field errors come from a hash map.
        error_messages.sort();

        let user_message = match error_messages.as_slice() {
            [] => "Validation failed.".to_string(),
            [single_error] => single_error.clone(),
            multiple => multiple.join(" "),
        };

        tracing::warn!(
            errors = ?errors.field_errors(),
            "Request validation failed"
        );

        ErrorKind::BadRequest.with_message(user_message)
    }
}

impl<T> aide::OperationInput for ValidateJson<T>
where
    T: schemars::JsonSchema,
{
    fn operation_input(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) {
        Json::<T>::operation_input(ctx, operation);
    }

    fn inferred_early_responses(
        ctx: &mut aide::generate::GenContext,
        operation: &mut aide::openapi::Operation,
    ) -> Vec<(Option<u16>, aide::openapi::Response)> {
        Json::<T>::inferred_early_responses(ctx, operation)
    }
}

#[cfg(test)]
mod tests {
    use validator::ValidationError;

    use super::*;

    #[test]
    fn custom_messages_are_used_verbatim() {
        let mut error = ValidationError::new("image_url");
        error.message = Some("Image URL must use http or https.".into());

        assert_eq!(
            format_validation_error("image_url", &error),
            "Image URL must use http or https."
        );
    }

    #[test]
    fn builtin_codes_name_the_field() {
        let error = ValidationError::new("url");
        assert_eq!(
            format_validation_error("image_url", &error),
            "Field 'image_url' must be a valid URL (e.g., https://example.com/image.jpg)."
        );
    }

    #[test]
    fn validation_errors_become_bad_requests() {
        let mut errors = ValidationErrors::new();
        errors.add("image_url", ValidationError::new("url"));

        let error = Error::from(errors);
        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(error.message().is_some_and(|m| m.contains("image_url")));
    }
}
