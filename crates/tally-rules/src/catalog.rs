//! # Rule Catalog
//!
//! Loads volume rules from a JSON file into a [`RuleStore`].
//!
//! ## File Format
//! ```json
//! {
//!   "rules": [
//!     { "product_id": "6f1c...", "units": 3, "price": "1.30" },
//!     { "id": "9a0e...", "product_id": "1b7d...", "units": 2, "price": "0.45" }
//!   ]
//! }
//! ```
//!
//! - `id` is optional; a random id is assigned when it is missing.
//! - `price` is a decimal string (a bare JSON number also parses, but strings
//!   keep the exact digits).
//! - Every record goes through `VolumePricingRule::new`, so `units: 0` is
//!   rejected the same way it would be in code.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::{Money, ProductId, RuleId, VolumePricingRule};
use tracing::info;
use uuid::Uuid;

use crate::config::RulesConfig;
use crate::error::{RulesError, RulesResult};
use crate::store::RuleStore;

/// One rule as written in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: RuleId,
    pub product_id: ProductId,
    pub units: i64,
    pub price: Decimal,
}

impl TryFrom<RuleRecord> for VolumePricingRule {
    type Error = RulesError;

    fn try_from(record: RuleRecord) -> RulesResult<Self> {
        Ok(VolumePricingRule::new(
            record.id,
            record.product_id,
            record.units,
            Money::from_decimal(record.price),
        )?)
    }
}

impl From<&VolumePricingRule> for RuleRecord {
    fn from(rule: &VolumePricingRule) -> Self {
        RuleRecord {
            id: rule.id(),
            product_id: rule.product_id(),
            units: rule.units(),
            price: rule.price().amount(),
        }
    }
}

/// The whole catalog file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleCatalog {
    #[serde(default)]
    pub rules: Vec<RuleRecord>,
}

impl RuleCatalog {
    /// Parses a catalog from JSON text.
    pub fn from_json_str(json: &str) -> RulesResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> RulesResult<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| RulesError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Captures the current contents of a store.
    pub fn from_store(store: &RuleStore) -> Self {
        RuleCatalog {
            rules: store.rules().iter().map(RuleRecord::from).collect(),
        }
    }

    /// Validates every record and builds a store.
    ///
    /// ## Errors
    /// - `Validation` for the first record that is not a valid rule
    /// - `DuplicateRule` when two records target the same product
    pub fn into_store(self) -> RulesResult<RuleStore> {
        let rules = self
            .rules
            .into_iter()
            .map(VolumePricingRule::try_from)
            .collect::<RulesResult<Vec<_>>>()?;
        RuleStore::from_rules(rules)
    }

    pub fn to_json_pretty(&self) -> RulesResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl RuleStore {
    /// Builds the store described by `config`.
    ///
    /// With no `rules_path` the store starts empty.
    pub fn load(config: &RulesConfig) -> RulesResult<Self> {
        let Some(path) = config.rules_path.as_deref() else {
            info!("No rule catalog configured, starting with an empty rule store");
            return Ok(RuleStore::new());
        };

        let store = RuleCatalog::from_path(path)?.into_store()?;
        info!(path = %path.display(), rules = store.len(), "Loaded rule catalog");
        Ok(store)
    }
}
