//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Security: CORS, security headers, body limits and compression
//! - Observability: request IDs and tracing spans
//! - Recovery: panics, timeouts and service errors
//! - Specification: OpenAPI document and Scalar UI
//!
//! ```rust,no_run
//! use axum::Router;
//! use lumen_server::middleware::{
//!     RouterObservabilityExt, RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = Router::new()
//!     .with_default_security()
//!     .with_observability()
//!     .with_default_recovery();
//! ```

mod observability;
mod recovery;
mod security;
mod specification;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{
    CorsConfig, DEFAULT_MAX_BODY_SIZE, FrameOptions, ReferrerPolicy, RouterSecurityExt,
    SecurityHeadersConfig,
};
pub use specification::{OpenApiConfig, RouterOpenApiExt};
