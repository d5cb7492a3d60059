//! Rule store configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable           | Default             | Meaning                          |
//! |--------------------|---------------------|----------------------------------|
//! | `TALLY_RULES_PATH` | unset (no rules)    | JSON rule catalog to load        |
//! | `TALLY_LOG`        | `info,tally=debug`  | tracing filter directive         |

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{RulesError, RulesResult};

/// Environment variable naming the rule catalog file.
pub const RULES_PATH_VAR: &str = "TALLY_RULES_PATH";

/// Environment variable holding the tracing filter.
pub const LOG_FILTER_VAR: &str = "TALLY_LOG";

/// Filter used when `TALLY_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tally=debug";

/// Rule store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// JSON catalog of volume rules; `None` starts with an empty store
    pub rules_path: Option<PathBuf>,

    /// tracing `EnvFilter` directive
    pub log_filter: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        RulesConfig {
            rules_path: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl RulesConfig {
    /// Load configuration from environment variables.
    pub fn load() -> RulesResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> RulesResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let rules_path = read(RULES_PATH_VAR).map(PathBuf::from);

        let log_filter = read(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        if log_filter.contains(char::is_whitespace) {
            return Err(RulesError::InvalidValue(LOG_FILTER_VAR.to_string()));
        }

        Ok(RulesConfig {
            rules_path,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = RulesConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, RulesConfig::default());
        assert_eq!(config.log_filter, "info,tally=debug");
        assert!(config.rules_path.is_none());
    }

    #[test]
    fn test_reads_values() {
        let config = RulesConfig::from_lookup(lookup(&[
            (RULES_PATH_VAR, "/etc/tally/rules.json"),
            (LOG_FILTER_VAR, "warn"),
        ]))
        .unwrap();

        assert_eq!(config.rules_path, Some(PathBuf::from("/etc/tally/rules.json")));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_blank_values_are_unset() {
        let vars = [(RULES_PATH_VAR, "  "), (LOG_FILTER_VAR, "")];
        let config = RulesConfig::from_lookup(lookup(&vars)).unwrap();
        assert_eq!(config, RulesConfig::default());
    }

    #[test]
    fn test_rejects_filter_with_spaces() {
        let vars = [(LOG_FILTER_VAR, "info, tally=debug")];
        let err = RulesConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, RulesError::InvalidValue(var) if var == LOG_FILTER_VAR));
    }
}
