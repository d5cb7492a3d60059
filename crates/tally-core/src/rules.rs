//! # Rules Lookup
//!
//! The one collaborator the core depends on: something that can answer
//! "is there a volume rule for this product?".
//!
//! ```text
//! PricingStrategyFactory ──get_by_product_id(id)──► VolumePricingRulesRepository
//!                        ◄── Some(rule) / None ────
//! ```
//!
//! `None` is the normal answer for most products and means "price regularly".
//! Implementations must be pure reads: the core may ask for the same product
//! any number of times.
//!
//! Besides the trait, this module implements it for a plain `HashMap` keyed
//! by product id (handy in tests) and for shared handles (`&T`, `Arc<T>`,
//! `Box<T>`) so one store can back many orders.

use std::collections::HashMap;
use std::sync::Arc;

use crate::types::{ProductId, VolumePricingRule};

/// Synchronous lookup of the volume rule that applies to a product.
pub trait VolumePricingRulesRepository {
    /// Returns the rule for `product_id`, or `None` when the product has no
    /// volume pricing.
    fn get_by_product_id(&self, product_id: ProductId) -> Option<VolumePricingRule>;
}

impl VolumePricingRulesRepository for HashMap<ProductId, VolumePricingRule> {
    fn get_by_product_id(&self, product_id: ProductId) -> Option<VolumePricingRule> {
        self.get(&product_id).cloned()
    }
}

impl<T: VolumePricingRulesRepository + ?Sized> VolumePricingRulesRepository for &T {
    fn get_by_product_id(&self, product_id: ProductId) -> Option<VolumePricingRule> {
        (**self).get_by_product_id(product_id)
    }
}

impl<T: VolumePricingRulesRepository + ?Sized> VolumePricingRulesRepository for Arc<T> {
    fn get_by_product_id(&self, product_id: ProductId) -> Option<VolumePricingRule> {
        (**self).get_by_product_id(product_id)
    }
}

impl<T: VolumePricingRulesRepository + ?Sized> VolumePricingRulesRepository for Box<T> {
    fn get_by_product_id(&self, product_id: ProductId) -> Option<VolumePricingRule> {
        (**self).get_by_product_id(product_id)
    }
}

/// A repository with no rules at all. Everything prices regularly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoVolumeRules;

impl VolumePricingRulesRepository for NoVolumeRules {
    fn get_by_product_id(&self, _product_id: ProductId) -> Option<VolumePricingRule> {
        None
    }
}
