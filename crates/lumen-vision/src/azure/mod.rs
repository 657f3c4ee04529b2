//! Azure AI Vision Image Analysis client.
//!
//! This module provides a reqwest-based implementation of the [`VisionProvider`] trait
//! that talks to the Image Analysis REST API.
//!
//! # Example
//!
//! ```rust,ignore
//! use lumen_vision::azure::{AzureClient, AzureConfig};
//! use lumen_vision::VisionService;
//!
//! let config = AzureConfig::new(endpoint, key);
//!
//! // Convert to a service for dependency injection
//! let service: VisionService = AzureClient::new(config)?.into_service();
//! ```
//!
//! [`VisionProvider`]: crate::VisionProvider

mod client;
mod config;
mod error;

pub use client::AzureClient;
pub use config::{AzureConfig, DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS};
pub use error::{Error, Result};

/// Tracing target for Azure client operations.
pub const TRACING_TARGET: &str = "lumen_vision::azure";
