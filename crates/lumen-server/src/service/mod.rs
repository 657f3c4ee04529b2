//! Application state and dependency injection.

mod config;

use lumen_vision::VisionService;

pub use crate::service::config::ServiceConfig;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). The vision
/// service is built once at startup and never replaced; `None` means the
/// server runs without vision credentials.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Debug, Clone)]
pub struct ServiceState {
    vision: Option<VisionService>,
    service_config: ServiceConfig,
}

impl ServiceState {
    /// Creates the application state.
    pub fn new(vision: Option<VisionService>, service_config: ServiceConfig) -> Self {
        Self {
            vision,
            service_config,
        }
    }

    /// Creates a state without a vision service.
    pub fn unconfigured(service_config: ServiceConfig) -> Self {
        Self::new(None, service_config)
    }

    /// Returns the vision service, if configured.
    #[inline]
    pub fn vision(&self) -> Option<&VisionService> {
        self.vision.as_ref()
    }

    /// Returns `true` when a vision service is available.
    #[inline]
    pub fn is_vision_configured(&self) -> bool {
        self.vision.is_some()
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(vision: Option<VisionService>);
impl_di!(service_config: ServiceConfig);
