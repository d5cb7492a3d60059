//! # Validation Module
//!
//! Argument guards shared by every constructor and mutator in the core.
//!
//! ## Where Each Guard Runs
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Product::new            ── validate_product_name, validate_price       │
//! │  VolumePricingRule::new  ── validate_units("units")                     │
//! │  VolumePricing::new      ── validate_units("threshold")                 │
//! │  ProductOrder::new       ── validate_units, validate_price              │
//! │  ProductOrder::add_units ── validate_units                              │
//! │  CheckOutOrder::add_order_item ── validate_units (before any lookup)    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{validate_units, validate_product_name};
//!
//! assert!(validate_units("units", 3).is_ok());
//! assert!(validate_units("units", 0).is_err());
//! assert!(validate_product_name("").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
///
/// Whitespace is not trimmed: `" "` is a name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a unit count or threshold.
///
/// ## Rules
/// - Must be at least 1
/// - No upper bound
///
/// `field` names the argument in the error so the caller can tell a bad
/// threshold from a bad quantity.
pub fn validate_units(field: &str, units: i64) -> ValidationResult<()> {
    if units < 1 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use tally_core::money::Money;
/// use tally_core::validation::validate_price;
///
/// assert!(validate_price("unit_price", Money::from_cents(70)).is_ok());
/// assert!(validate_price("unit_price", Money::zero()).is_ok());
/// assert!(validate_price("unit_price", Money::from_cents(-1)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
