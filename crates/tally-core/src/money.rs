//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    3 × 0.50 - 1.30 = 0.19999999999999996  ❌ WRONG!                     │
//! │                                                                         │
//! │  A volume discount computed that way drifts by a fraction of a cent   │
//! │  on every bundle, and totals stop matching the shelf label.            │
//! │                                                                         │
//! │  OUR SOLUTION: Base-10 Decimal                                          │
//! │    3 × 0.50 - 1.30 = 0.20 exactly                                       │
//! │    No rounding happens unless somebody asks for it                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! // Create from cents or from a decimal literal
//! let price = Money::from_cents(70);               // 0.70
//! let same: Money = "0.70".parse().unwrap();
//! assert_eq!(price, same);
//!
//! // Arithmetic operations
//! let line = price * 3;                            // 2.10
//! assert_eq!(line, Money::from_cents(210));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::str::FromStr;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value as an exact base-10 decimal.
///
/// ## Design Decisions
/// - **Decimal (signed)**: Allows negative values for discounts
/// - **Single field tuple struct**: Zero-cost wrapper over `Decimal`
/// - **No currency**: Currency and display formatting belong to the caller
/// - **Numeric equality**: `2.1` and `2.10` compare equal
///
/// ## Range
/// Amounts are bounded by `Decimal` (about ±7.9 × 10²⁸). The operator impls
/// panic past that bound the way integer arithmetic does; pricing code goes
/// through the `checked_*` methods and reports `None` instead.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.unit_price ──► ProductOrder.unit_price ──► PricingStrategy     │
/// │                                                          │              │
/// │  VolumePricingRule.price ────────────────────────────────┘              │
/// │                                                          │              │
/// │                          ProductOrder.total_price ◄──────┘              │
/// │                                     │                                   │
/// │                                     ▼                                   │
/// │                          CheckOutOrder.total_price                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Wraps an existing decimal amount.
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Creates a Money value from cents (two decimal places).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(130);
    /// assert_eq!(price.to_string(), "1.30");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal amount.
    #[inline]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Checks if the value is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(70);
    /// let line_total = unit_price.multiply_quantity(3);
    /// assert_eq!(line_total, Money::from_cents(210));
    /// ```
    ///
    /// ## Panics
    /// When the product leaves the `Decimal` range. See
    /// [`checked_multiply_quantity`](Money::checked_multiply_quantity).
    #[inline]
    pub fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * Decimal::from(qty))
    }

    /// Multiplies money by a quantity, or `None` on overflow.
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(Decimal::from(qty)).map(Money)
    }

    /// Adds two amounts, or `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts `other`, or `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Prints the bare decimal amount, keeping its scale (`1.30`, not `1.3`).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by a unit count.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

/// Summing line totals; an empty iterator sums to zero.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
