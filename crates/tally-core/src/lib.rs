//! # tally-core: Pure Pricing Logic for Tally Checkout
//!
//! This crate is the **heart** of Tally. It prices a checkout order, applying
//! per-product volume discounts, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │  pricing  │  │   order   │  │   money   │  │   │
//! │  │   │  Product  │  │ Strategy  │  │ CheckOut  │  │   Money   │  │   │
//! │  │   │   Rule    │  │  Factory  │  │ LineItem  │  │ (decimal) │  │   │
//! │  │   └───────────┘  └─────┬─────┘  └───────────┘  └───────────┘  │   │
//! │  │                        │ VolumePricingRulesRepository (trait)  │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └────────────────────────┼────────────────────────────────────────┘   │
//! │                           │                                            │
//! │  ┌────────────────────────▼────────────────────────────────────────┐   │
//! │  │                tally-rules (Rule Store)                         │   │
//! │  │          in-memory store, JSON catalog, env config              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Product and VolumePricingRule
//! - [`money`] - Money type with exact decimal arithmetic (no floating point!)
//! - [`pricing`] - Regular and volume strategies, and the factory that picks one
//! - [`rules`] - The rules lookup trait the factory depends on
//! - [`order`] - CheckOutOrder and its ProductOrder lines
//! - [`error`] - The invalid-argument error type
//! - [`validation`] - Argument guards
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::HashMap;
//! use tally_core::{CheckOutOrder, Money, PricingStrategyFactory, Product, VolumePricingRule};
//! use uuid::Uuid;
//!
//! let a = Product::new(Uuid::new_v4(), "A", Money::from_cents(50)).unwrap();
//! let rule = VolumePricingRule::new(Uuid::new_v4(), a.id(), 3, Money::from_cents(130)).unwrap();
//! let rules = HashMap::from([(a.id(), rule)]);
//!
//! let mut order = CheckOutOrder::new(Uuid::new_v4(), PricingStrategyFactory::new(&rules));
//! order.add_order_item(&a, 10).unwrap();
//!
//! // 10 × 0.50 - 3 × (3 × 0.50 - 1.30)
//! assert_eq!(order.total_price(), Ok(Money::from_cents(440)));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod pricing;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use order::{CheckOutOrder, OrderTotals, ProductOrder};
pub use pricing::{PricingStrategy, PricingStrategyFactory, VolumePricing};
pub use rules::{NoVolumeRules, VolumePricingRulesRepository};
pub use types::*;
pub use validation::ValidationResult;
