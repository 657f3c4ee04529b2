//! All `aide::axum::`[`ApiRouter`]s with related `axum::`[`Handler`]s.
//!
//! [`ApiRouter`]: aide::axum::ApiRouter
//! [`Handler`]: axum::handler::Handler

mod analysis;
mod categorize;
mod error;
mod monitors;
pub mod request;
pub mod response;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, RemoteCall, Result};
pub use crate::handler::response::ErrorResponse;
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes.
///
/// Unknown paths answer with a `NOT_FOUND` error body.
pub fn routes() -> ApiRouter<ServiceState> {
    ApiRouter::new()
        .merge(monitors::routes())
        .merge(analysis::routes())
        .merge(categorize::routes())
        .fallback(handler)
}
