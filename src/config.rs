//! Immutable pipeline configuration.
//!
//! A [`PipelineConfig`] bundles the atomic numbers the functional-group
//! finder accepts, the failure policy of the composite filter predicates and
//! the hash scheme. [`shared`] hands out a process-wide instance built on
//! first use; callers needing something else build their own and pass it by
//! reference.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::hash::HashScheme;

/// Non-metals relevant to organic functional-group chemistry: H, He, C, N,
/// O, F, Ne, P, S, Cl, Ar, Se, Br, Kr, I, Xe, Rn.
pub const STANDARD_ATOMIC_NUMBERS: [u8; 17] =
    [1, 2, 6, 7, 8, 9, 10, 15, 16, 17, 18, 34, 35, 36, 53, 54, 86];

/// What a composite filter predicate does when an underlying check fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log the error and answer "reject" / "not ready".
    #[default]
    FailClosed,
    /// Hand the error to the caller.
    Propagate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    valid_atomic_numbers: BTreeSet<u8>,
    failure_policy: FailurePolicy,
    require_formal_charge: bool,
    hash_scheme: HashScheme,
}

static SHARED: Lazy<PipelineConfig> = Lazy::new(PipelineConfig::standard);

/// The process-wide standard configuration.
pub fn shared() -> &'static PipelineConfig {
    &SHARED
}

impl PipelineConfig {
    pub fn standard() -> Self {
        Self {
            valid_atomic_numbers: STANDARD_ATOMIC_NUMBERS.into_iter().collect(),
            failure_policy: FailurePolicy::FailClosed,
            require_formal_charge: true,
            hash_scheme: HashScheme::functional_group(),
        }
    }

    /// Reads a configuration from JSON. Missing fields keep their standard
    /// values.
    ///
    /// ```
    /// use fgprep::config::{FailurePolicy, PipelineConfig};
    ///
    /// let cfg = PipelineConfig::from_json(r#"{"failure_policy": "propagate"}"#).unwrap();
    /// assert_eq!(cfg.failure_policy(), FailurePolicy::Propagate);
    /// assert!(cfg.is_valid_atomic_number(6));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sorted copy of the accepted atomic numbers.
    pub fn valid_atomic_numbers(&self) -> Vec<u8> {
        self.valid_atomic_numbers.iter().copied().collect()
    }

    pub fn is_valid_atomic_number(&self, z: u8) -> bool {
        self.valid_atomic_numbers.contains(&z)
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn require_formal_charge(&self) -> bool {
        self.require_formal_charge
    }

    pub fn hash_scheme(&self) -> &HashScheme {
        &self.hash_scheme
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_require_formal_charge(mut self, required: bool) -> Self {
        self.require_formal_charge = required;
        self
    }

    pub fn with_valid_atomic_numbers(mut self, numbers: impl IntoIterator<Item = u8>) -> Self {
        self.valid_atomic_numbers = numbers.into_iter().collect();
        self
    }

    pub fn with_hash_scheme(mut self, scheme: HashScheme) -> Self {
        self.hash_scheme = scheme;
        self
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_set() {
        let cfg = PipelineConfig::standard();
        assert_eq!(cfg.valid_atomic_numbers(), STANDARD_ATOMIC_NUMBERS.to_vec());
        assert!(cfg.is_valid_atomic_number(34));
        assert!(!cfg.is_valid_atomic_number(5));
        assert!(!cfg.is_valid_atomic_number(0));
        assert_eq!(cfg.failure_policy(), FailurePolicy::FailClosed);
        assert!(cfg.require_formal_charge());
    }

    #[test]
    fn shared_is_standard() {
        assert_eq!(shared(), &PipelineConfig::standard());
        assert!(std::ptr::eq(shared(), shared()));
    }

    #[test]
    fn json_overrides() {
        let cfg = PipelineConfig::from_json(
            r#"{"valid_atomic_numbers": [6, 8], "require_formal_charge": false}"#,
        )
        .unwrap();
        assert_eq!(cfg.valid_atomic_numbers(), vec![6, 8]);
        assert!(!cfg.require_formal_charge());
        assert_eq!(cfg.failure_policy(), FailurePolicy::FailClosed);
        assert_eq!(cfg.hash_scheme(), &HashScheme::functional_group());

        assert!(PipelineConfig::from_json(r#"{"failure_policy": "sometimes"}"#).is_err());
    }

    #[test]
    fn getters_return_copies() {
        let cfg = PipelineConfig::standard();
        let mut numbers = cfg.valid_atomic_numbers();
        numbers.push(26);
        assert!(!cfg.is_valid_atomic_number(26));
    }
}
