//! Vision service extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use derive_more::{Deref, DerefMut};
use lumen_vision::VisionService;

use crate::handler::{Error, ErrorKind};
use crate::service::ServiceState;

/// Extracts the configured [`VisionService`] from the application state.
///
/// Rejects with a `NOT_CONFIGURED` error when the server started without
/// vision credentials. Being a parts extractor, it runs before the request
/// body is read, so an unconfigured server answers 500 regardless of the
/// body.
#[must_use]
#[derive(Debug, Clone, Deref, DerefMut)]
pub struct Vision(pub VisionService);

impl FromRequestParts<ServiceState> for Vision {
    type Rejection = Error<'static>;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        match state.vision() {
            Some(service) => Ok(Self(service.clone())),
            None => Err(ErrorKind::NotConfigured
                .with_context(format!("{} {}", parts.method, parts.uri.path()))),
        }
    }
}

impl aide::OperationInput for Vision {}
