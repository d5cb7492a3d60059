//! # Error Types
//!
//! Domain error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  └── ValidationError  - Invalid argument passed to a constructor or    │
//! │                         mutator                                        │
//! │                                                                         │
//! │  tally-rules errors (separate crate)                                   │
//! │  └── RulesError       - Catalog, config and telemetry failures         │
//! │                                                                         │
//! │  Flow: ValidationError → RulesError → caller                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every failure in the core is a precondition violation the caller can fix
//! by passing different input. There is no fatal category and nothing in the
//! core retries.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Invalid argument errors.
///
/// A constructor or mutator that returns one of these has not changed any
/// state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be at least one.
    ///
    /// ## When This Occurs
    /// - Line item created with zero or negative units
    /// - `add_units(-1)` on an existing line
    /// - Volume rule or strategy with a threshold below one
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value does not fit the numeric type that carries it.
    ///
    /// ## When This Occurs
    /// - `add_units` pushes a line past `i64::MAX` units
    /// - A line or order total exceeds the range of `Money`
    #[error("{field} is out of range")]
    Overflow { field: String },
}

impl ValidationError {
    /// The name of the argument that was rejected.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::Overflow { field } => field,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
