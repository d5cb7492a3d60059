//! # Pricing Module
//!
//! Turns a unit count and a unit price into a line total.
//!
//! ## Strategies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      PricingStrategy                                    │
//! │                                                                         │
//! │   Regular                      Volume { threshold: T, bundle_price: P } │
//! │   ───────                      ─────────────────────────────────────── │
//! │   units × unit_price           units < T  → units × unit_price          │
//! │                                units ≥ T  → units × unit_price          │
//! │                                             - discount                  │
//! │                                                                         │
//! │   discount = T × unit_price - P                                         │
//! │   bundles  = units / T   (integer division)                             │
//! │   if bundles > 1 { discount × bundles }                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Worked Example
//! Product A at 0.50, rule "3 for 1.30", 10 units:
//! ```text
//! regular  = 10 × 0.50        = 5.00
//! discount = 3 × 0.50 - 1.30  = 0.20
//! bundles  = 10 / 3           = 3      → discount = 0.60
//! total    = 5.00 - 0.60      = 4.40
//! ```
//! The leftover unit past the last full bundle is charged at the unit price.
//!
//! ## Resolution
//! [`PricingStrategyFactory`] picks the variant by asking a
//! [`VolumePricingRulesRepository`] whether the product has a rule.
//!
//! ## Range
//! Totals that leave the range of [`Money`] are reported as
//! `ValidationError::Overflow { field: "total_price" }`.

use serde::Serialize;
use tracing::debug;

use crate::error::ValidationError;
use crate::money::Money;
use crate::rules::VolumePricingRulesRepository;
use crate::types::{ProductId, VolumePricingRule};
use crate::validation::{validate_units, ValidationResult};

pub(crate) fn total_overflow() -> ValidationError {
    ValidationError::Overflow {
        field: "total_price".to_string(),
    }
}

/// The undiscounted price of `units` at `unit_price`.
///
/// Both strategies start from this amount.
#[inline]
pub fn regular_total(units: i64, unit_price: Money) -> ValidationResult<Money> {
    unit_price
        .checked_multiply_quantity(units)
        .ok_or_else(total_overflow)
}

// =============================================================================
// Volume Pricing
// =============================================================================

/// Parameters of a bundle discount: `threshold` units cost `bundle_price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VolumePricing {
    threshold: i64,
    bundle_price: Money,
}

impl VolumePricing {
    /// Creates volume pricing for bundles of `threshold` units.
    ///
    /// ## Errors
    /// - `MustBePositive { field: "threshold" }` when `threshold < 1`
    pub fn new(threshold: i64, bundle_price: Money) -> ValidationResult<Self> {
        validate_units("threshold", threshold)?;

        Ok(VolumePricing {
            threshold,
            bundle_price,
        })
    }

    #[inline]
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    #[inline]
    pub fn bundle_price(&self) -> Money {
        self.bundle_price
    }

    /// The amount taken off the regular total for `units`.
    ///
    /// Zero below the threshold. The per-bundle saving is worked out once
    /// and scaled by the number of complete bundles.
    pub fn discount(&self, units: i64, unit_price: Money) -> ValidationResult<Money> {
        if units < self.threshold {
            return Ok(Money::zero());
        }

        let mut discount = regular_total(self.threshold, unit_price)?
            .checked_sub(self.bundle_price)
            .ok_or_else(total_overflow)?;

        let bundles = units / self.threshold;
        if bundles > 1 {
            discount = discount
                .checked_multiply_quantity(bundles)
                .ok_or_else(total_overflow)?;
        }

        Ok(discount)
    }

    pub fn compute_total(&self, units: i64, unit_price: Money) -> ValidationResult<Money> {
        regular_total(units, unit_price)?
            .checked_sub(self.discount(units, unit_price)?)
            .ok_or_else(total_overflow)
    }
}

/// A validated rule always yields valid volume pricing.
impl From<&VolumePricingRule> for VolumePricing {
    fn from(rule: &VolumePricingRule) -> Self {
        VolumePricing {
            threshold: rule.units(),
            bundle_price: rule.price(),
        }
    }
}

// =============================================================================
// Pricing Strategy
// =============================================================================

/// How a line item turns its units into a total.
///
/// Bound to a line when the line is created and never swapped afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PricingStrategy {
    /// Every unit at the unit price.
    #[default]
    Regular,
    /// Bundle discount once the threshold is reached.
    Volume(VolumePricing),
}

impl PricingStrategy {
    /// Shorthand for [`VolumePricing::new`] wrapped in the `Volume` variant.
    pub fn volume(threshold: i64, bundle_price: Money) -> ValidationResult<Self> {
        VolumePricing::new(threshold, bundle_price).map(PricingStrategy::Volume)
    }

    /// Computes the total for `units` at `unit_price`.
    ///
    /// ## Errors
    /// - `Overflow { field: "total_price" }` when the total leaves the
    ///   range of `Money`
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Money, PricingStrategy};
    ///
    /// let unit_price = Money::from_cents(50);
    ///
    /// let regular = PricingStrategy::Regular.compute_total(10, unit_price);
    /// assert_eq!(regular, Ok(Money::from_cents(500)));
    ///
    /// let three_for_130 = PricingStrategy::volume(3, Money::from_cents(130)).unwrap();
    /// assert_eq!(three_for_130.compute_total(10, unit_price), Ok(Money::from_cents(440)));
    /// ```
    pub fn compute_total(&self, units: i64, unit_price: Money) -> ValidationResult<Money> {
        match self {
            PricingStrategy::Regular => regular_total(units, unit_price),
            PricingStrategy::Volume(volume) => volume.compute_total(units, unit_price),
        }
    }

    #[inline]
    pub fn is_volume(&self) -> bool {
        matches!(self, PricingStrategy::Volume(_))
    }
}

// =============================================================================
// Pricing Strategy Factory
// =============================================================================

/// Resolves the strategy for a product from its volume rule, if any.
///
/// ## Usage
/// ```rust
/// use std::collections::HashMap;
/// use tally_core::{Money, PricingStrategy, PricingStrategyFactory, VolumePricingRule};
/// use uuid::Uuid;
///
/// let product_a = Uuid::new_v4();
/// let rule =
///     VolumePricingRule::new(Uuid::new_v4(), product_a, 3, Money::from_cents(130)).unwrap();
/// let factory = PricingStrategyFactory::new(HashMap::from([(product_a, rule)]));
///
/// assert!(factory.create(product_a).is_volume());
/// assert_eq!(factory.create(Uuid::new_v4()), PricingStrategy::Regular);
/// ```
#[derive(Debug, Clone)]
pub struct PricingStrategyFactory<R> {
    rules: R,
}

impl<R: VolumePricingRulesRepository> PricingStrategyFactory<R> {
    pub fn new(rules: R) -> Self {
        PricingStrategyFactory { rules }
    }

    /// Looks up the product's rule and returns a fresh strategy.
    ///
    /// Nothing is cached: a rule added to the repository is seen by the next
    /// call.
    pub fn create(&self, product_id: ProductId) -> PricingStrategy {
        match self.rules.get_by_product_id(product_id) {
            Some(rule) => {
                debug!(
                    product_id = %product_id,
                    threshold = rule.units(),
                    bundle_price = %rule.price(),
                    "Resolved volume pricing"
                );
                PricingStrategy::Volume(VolumePricing::from(&rule))
            }
            None => {
                debug!(product_id = %product_id, "Resolved regular pricing");
                PricingStrategy::Regular
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
