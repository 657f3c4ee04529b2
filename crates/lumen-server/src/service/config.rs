use std::num::NonZeroUsize;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

/// Default values for configuration options.
mod defaults {
    /// Default number of images analyzed at once by a batch.
    pub const BATCH_CONCURRENCY: usize = 1;

    /// Upper bound for batch concurrency.
    pub const MAX_BATCH_CONCURRENCY: usize = 32;

    /// Default time budget of a batch in seconds.
    ///
    /// Below the default whole-request timeout, so a slow batch still
    /// answers with its partial results.
    pub const BATCH_TIMEOUT_SECS: u64 = 90;
}

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Number of images of a batch analyzed at the same time.
    ///
    /// `1` processes the batch strictly one image after another. Results are
    /// aggregated in input order for any value.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "batch-concurrency",
            env = "BATCH_CONCURRENCY",
            default_value_t = defaults::BATCH_CONCURRENCY,
            value_parser = clap::builder::RangedU64ValueParser::<usize>::new()
                .range(1..=defaults::MAX_BATCH_CONCURRENCY as u64)
        )
    )]
    pub batch_concurrency: usize,

    /// Time budget of a batch in seconds.
    ///
    /// Images still pending when it runs out are reported in
    /// `failed_images`. Keep it below the request timeout.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "batch-timeout",
            env = "BATCH_TIMEOUT",
            default_value_t = defaults::BATCH_TIMEOUT_SECS
        )
    )]
    #[serde(default = "default_batch_timeout")]
    pub batch_timeout: u64,
}

fn default_batch_timeout() -> u64 {
    defaults::BATCH_TIMEOUT_SECS
}

impl ServiceConfig {
    /// Creates a configuration with the given batch concurrency.
    pub fn new(batch_concurrency: usize) -> Self {
        Self {
            batch_concurrency,
            batch_timeout: defaults::BATCH_TIMEOUT_SECS,
        }
    }

    /// Sets the batch time budget in seconds.
    pub fn with_batch_timeout(mut self, batch_timeout: u64) -> Self {
        self.batch_timeout = batch_timeout;
        self
    }

    /// Returns the batch time budget.
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout)
    }

    /// Returns the batch concurrency, clamped to the supported range.
    pub fn batch_concurrency(&self) -> NonZeroUsize {
        let concurrency = self
            .batch_concurrency
            .clamp(1, defaults::MAX_BATCH_CONCURRENCY);
        NonZeroUsize::new(concurrency).unwrap_or(NonZeroUsize::MIN)
    }

    /// Validates all configuration values.
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=defaults::MAX_BATCH_CONCURRENCY).contains(&self.batch_concurrency) {
            return Err(format!(
                "batch concurrency must be between 1 and {}, got {}",
                defaults::MAX_BATCH_CONCURRENCY,
                self.batch_concurrency
            ));
        }

        if self.batch_timeout == 0 {
            return Err("batch timeout must be at least 1 second".to_owned());
        }

        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new(defaults::BATCH_CONCURRENCY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sequential() {
        let config = ServiceConfig::default();
        assert_eq!(config.batch_concurrency().get(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn concurrency_is_clamped() {
        assert_eq!(ServiceConfig::new(0).batch_concurrency().get(), 1);
        assert_eq!(ServiceConfig::new(100).batch_concurrency().get(), 32);
        assert_eq!(ServiceConfig::new(8).batch_concurrency().get(), 8);
    }

    #[test]
    fn out_of_range_concurrency_is_invalid() {
        assert!(ServiceConfig::new(0).validate().is_err());
        assert!(ServiceConfig::new(33).validate().is_err());
        assert!(ServiceConfig::new(32).validate().is_ok());
    }

    #[test]
    fn zero_batch_timeout_is_invalid() {
        let config = ServiceConfig::default().with_batch_timeout(0);
        assert!(config.validate().is_err());

        let config = ServiceConfig::default().with_batch_timeout(5);
        assert_eq!(config.batch_timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }
}
