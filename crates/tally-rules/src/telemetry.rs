//! Tracing setup for hosts embedding the checkout.
//!
//! `RUST_LOG` takes precedence over the configured filter so a single run can
//! be made noisier without touching configuration.

use tracing_subscriber::EnvFilter;

use crate::config::RulesConfig;
use crate::error::{RulesError, RulesResult};

/// Builds the filter: `RUST_LOG` if set, otherwise `config.log_filter`.
pub fn env_filter(config: &RulesConfig) -> RulesResult<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_filter)
        .map_err(|_| RulesError::InvalidValue(crate::config::LOG_FILTER_VAR.to_string()))
}

/// Installs the global fmt subscriber.
///
/// ## Errors
/// - `InvalidValue` when the configured filter does not parse
/// - `Telemetry` when a global subscriber is already installed
pub fn init_tracing(config: &RulesConfig) -> RulesResult<()> {
    let filter = env_filter(config)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| RulesError::Telemetry(e.to_string()))
}
