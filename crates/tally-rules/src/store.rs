//! # Rule Store
//!
//! In-memory home of the volume pricing rules, keyed by product id.
//!
//! ## Sharing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   RuleStore (clone) ──┐                                                 │
//! │   RuleStore (clone) ──┼──► Arc<RwLock<HashMap<ProductId, Rule>>>        │
//! │   RuleStore (clone) ──┘                                                 │
//! │        │                                                                │
//! │        └──► PricingStrategyFactory::new(store.clone())                  │
//! │                                                                         │
//! │  Every clone sees the same rules. Upserts are visible to the next       │
//! │  strategy lookup, never to lines that were already priced.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::{CheckOutOrder, Money, PricingStrategyFactory, Product, VolumePricingRule};
//! use tally_rules::RuleStore;
//! use uuid::Uuid;
//!
//! let store = RuleStore::new();
//! let a = Product::new(Uuid::new_v4(), "A", Money::from_cents(50)).unwrap();
//! let rule = VolumePricingRule::new(Uuid::new_v4(), a.id(), 3, Money::from_cents(130)).unwrap();
//! store.upsert(rule);
//!
//! let factory = PricingStrategyFactory::new(store.clone());
//! let mut order = CheckOutOrder::new(Uuid::new_v4(), factory);
//! order.add_order_item(&a, 3).unwrap();
//! assert_eq!(order.total_price(), Ok(Money::from_cents(130)));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tally_core::{ProductId, VolumePricingRule, VolumePricingRulesRepository};
use tracing::debug;

use crate::error::{RulesError, RulesResult};

/// Shared, cloneable store of volume pricing rules.
///
/// Holds at most one rule per product.
#[derive(Debug, Clone, Default)]
pub struct RuleStore {
    rules: Arc<RwLock<HashMap<ProductId, VolumePricingRule>>>,
}

impl RuleStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from a list of rules.
    ///
    /// ## Errors
    /// - `DuplicateRule` when two rules target the same product
    pub fn from_rules<I>(rules: I) -> RulesResult<Self>
    where
        I: IntoIterator<Item = VolumePricingRule>,
    {
        let mut map = HashMap::new();
        for rule in rules {
            let product_id = rule.product_id();
            if map.insert(product_id, rule).is_some() {
                return Err(RulesError::DuplicateRule { product_id });
            }
        }

        debug!(count = map.len(), "Built rule store");
        Ok(RuleStore {
            rules: Arc::new(RwLock::new(map)),
        })
    }

    /// Inserts or replaces the rule for the rule's product.
    ///
    /// Returns the rule it replaced, if any.
    pub fn upsert(&self, rule: VolumePricingRule) -> Option<VolumePricingRule> {
        let product_id = rule.product_id();
        let previous = self.write().insert(product_id, rule);

        debug!(
            product_id = %product_id,
            replaced = previous.is_some(),
            "Upserted volume rule"
        );
        previous
    }

    /// Removes the rule for `product_id`. Returns it if there was one.
    pub fn remove(&self, product_id: ProductId) -> Option<VolumePricingRule> {
        let removed = self.write().remove(&product_id);
        debug!(product_id = %product_id, removed = removed.is_some(), "Removed volume rule");
        removed
    }

    /// Number of rules in the store.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Snapshot of all rules, ordered by product id.
    pub fn rules(&self) -> Vec<VolumePricingRule> {
        let mut rules: Vec<VolumePricingRule> = self.read().values().cloned().collect();
        rules.sort_by_key(VolumePricingRule::product_id);
        rules
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<ProductId, VolumePricingRule>> {
        self.rules.read().expect("Rule store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ProductId, VolumePricingRule>> {
        self.rules.write().expect("Rule store lock poisoned")
    }
}

impl VolumePricingRulesRepository for RuleStore {
    fn get_by_product_id(&self, product_id: ProductId) -> Option<VolumePricingRule> {
        self.read().get(&product_id).cloned()
    }
}
