//! # Domain Types
//!
//! The two value entities the checkout reads but never owns.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐        ┌─────────────────────┐                     │
//! │  │    Product      │        │  VolumePricingRule  │                     │
//! │  │  ─────────────  │        │  ─────────────────  │                     │
//! │  │  id (UUID)      │◄───────│  product_id         │                     │
//! │  │  name           │        │  id (UUID)          │                     │
//! │  │  unit_price     │        │  units (threshold)  │                     │
//! │  └─────────────────┘        │  price (bundle)     │                     │
//! │                             └─────────────────────┘                     │
//! │                                                                         │
//! │  "3 for 1.30" on a 0.50 product is                                      │
//! │  VolumePricingRule { units: 3, price: 1.30 }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both types are immutable after construction and validate their invariants
//! in `new`, so a value that exists is always valid.

use serde::Serialize;
use uuid::Uuid;

use crate::money::Money;
use crate::validation::{validate_price, validate_product_name, validate_units, ValidationResult};

/// Identifies a product.
pub type ProductId = Uuid;

/// Identifies a volume pricing rule.
pub type RuleId = Uuid;

/// Identifies a checkout order.
pub type OrderId = Uuid;

/// Identifies a line item within an order.
pub type LineId = Uuid;

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    id: ProductId,
    name: String,
    unit_price: Money,
}

impl Product {
    /// Creates a product.
    ///
    /// ## Errors
    /// - `Required { field: "name" }` when `name` is empty
    /// - `Negative { field: "unit_price" }` when the price is below zero
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::{Money, Product};
    /// use uuid::Uuid;
    ///
    /// let product = Product::new(Uuid::new_v4(), "C", Money::from_cents(70)).unwrap();
    /// assert_eq!(product.name(), "C");
    ///
    /// assert!(Product::new(Uuid::new_v4(), "", Money::from_cents(70)).is_err());
    /// ```
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        unit_price: Money,
    ) -> ValidationResult<Self> {
        let name = name.into();
        validate_product_name(&name)?;
        validate_price("unit_price", unit_price)?;

        Ok(Product {
            id,
            name,
            unit_price,
        })
    }

    #[inline]
    pub fn id(&self) -> ProductId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
}

// =============================================================================
// Volume Pricing Rule
// =============================================================================

/// "`units` of this product cost `price` together."
///
/// The rule only states the bundle; the discount it earns is worked out by
/// [`VolumePricing`](crate::pricing::VolumePricing) against the line's unit
/// price. The bundle price itself is not range checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumePricingRule {
    id: RuleId,
    product_id: ProductId,
    units: i64,
    price: Money,
}

impl VolumePricingRule {
    /// Creates a rule.
    ///
    /// ## Errors
    /// - `MustBePositive { field: "units" }` when `units < 1`
    pub fn new(
        id: RuleId,
        product_id: ProductId,
        units: i64,
        price: Money,
    ) -> ValidationResult<Self> {
        validate_units("units", units)?;

        Ok(VolumePricingRule {
            id,
            product_id,
            units,
            price,
        })
    }

    #[inline]
    pub fn id(&self) -> RuleId {
        self.id
    }

    #[inline]
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// The bundle size (discount threshold).
    #[inline]
    pub fn units(&self) -> i64 {
        self.units
    }

    /// The price of one full bundle.
    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
