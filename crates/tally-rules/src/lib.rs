//! # tally-rules: Volume Rule Store for Tally Checkout
//!
//! Everything around the volume rules that is not pricing: where they live,
//! how they are loaded, and how the host process is configured.
//!
//! ## Startup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  RulesConfig::load()          TALLY_RULES_PATH, TALLY_LOG               │
//! │       │                                                                 │
//! │       ├──► telemetry::init_tracing(&config)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RuleStore::load(&config)     JSON catalog → validated rules            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PricingStrategyFactory::new(store.clone())  ──► CheckOutOrder::new     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - `RuleStore`, the shared in-memory repository
//! - [`catalog`] - JSON catalog format and loading
//! - [`config`] - Environment configuration
//! - [`telemetry`] - tracing subscriber setup
//! - [`error`] - `RulesError`

pub mod catalog;
pub mod config;
pub mod error;
pub mod store;
pub mod telemetry;

pub use catalog::{RuleCatalog, RuleRecord};
pub use config::RulesConfig;
pub use error::{RulesError, RulesResult};
pub use store::RuleStore;
pub use telemetry::init_tracing;
