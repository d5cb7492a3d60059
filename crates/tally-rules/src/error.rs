//! # Rule Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  std::io::Error ─────────┐                                              │
//! │  serde_json::Error ──────┤                                              │
//! │  ValidationError ────────┼──► RulesError (this module) ──► caller       │
//! │  duplicate product ──────┤                                              │
//! │  bad env value ──────────┘                                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use tally_core::{ProductId, ValidationError};
use thiserror::Error;

/// Rule store, catalog and configuration errors.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The catalog file could not be read.
    #[error("Failed to read rule catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The catalog is not valid JSON or does not match the expected shape.
    #[error("Invalid rule catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A catalog record failed domain validation (e.g. `units: 0`).
    #[error("Invalid rule: {0}")]
    Validation(#[from] ValidationError),

    /// Two catalog records target the same product.
    #[error("Duplicate volume rule for product {product_id}")]
    DuplicateRule { product_id: ProductId },

    /// A configuration value could not be used.
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    /// The tracing subscriber could not be installed.
    #[error("Failed to initialise tracing: {0}")]
    Telemetry(String),
}

/// Convenience type alias for Results with RulesError.
pub type RulesResult<T> = Result<T, RulesError>;
