//! Strata Missing Data Policy
//!
//! Decides whether an aggregated value survives the source data missing
//! from its interval. Missing data is measured in weighted components: a
//! source step that lies entirely inside the target interval counts as one,
//! a step that only partly overlaps counts as its overlapping fraction.
//!
//! @version 0.1.0
//! @author Strata Development Team

use serde::{Deserialize, Serialize};
use strata_common::{Result, StrataError};

/// Slack added to the allowed missing fraction before a bucket is voided.
pub const MISSING_TOLERANCE: f64 = 1e-5;

/// Below this, a missing amount is treated as zero and the bucket as complete;
/// the same margin decides when a bucket is entirely missing.
pub const FULLY_MISSING_EPSILON: f64 = 1e-36;

// =============================================================================
// Verdict
// =============================================================================

/// Outcome of the missing data check for one target interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Too much is missing; the target value becomes NaN.
    Void,
    /// The value stands but gets the missing flag.
    FlaggedPresent,
    /// Nothing is missing.
    Clean,
}

/// Classify an interval from its weighted `missing` and `total_components`.
pub fn verdict(missing: f64, total_components: f64, missing_allowed: f64) -> Verdict {
    if total_components <= 0.0 || total_components.is_nan() {
        return Verdict::Void;
    }
    if (missing - total_components).abs() < FULLY_MISSING_EPSILON {
        return Verdict::Void;
    }
    let fraction = missing / total_components;
    if fraction > missing_allowed + MISSING_TOLERANCE {
        Verdict::Void
    } else if fraction > FULLY_MISSING_EPSILON {
        Verdict::FlaggedPresent
    } else {
        Verdict::Clean
    }
}

// =============================================================================
// Missing Data Policy
// =============================================================================

/// Tolerance for missing source data and the flag marking incomplete values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingDataPolicy {
    missing_allowed: f64,
    missing_flag: String,
}

impl MissingDataPolicy {
    /// `missing_allowed` is the fraction of an interval that may be missing.
    pub fn new(missing_allowed: f64, missing_flag: impl Into<String>) -> Result<Self> {
        if !(0.0..=1.0).contains(&missing_allowed) {
            return Err(StrataError::Configuration(format!(
                "missing_allowed must be between 0 and 1, got {}",
                missing_allowed
            )));
        }
        Ok(Self {
            missing_allowed,
            missing_flag: missing_flag.into(),
        })
    }

    /// No missing data tolerated.
    pub fn strict(missing_flag: impl Into<String>) -> Self {
        Self {
            missing_allowed: 0.0,
            missing_flag: missing_flag.into(),
        }
    }

    pub fn missing_allowed(&self) -> f64 {
        self.missing_allowed
    }

    pub fn missing_flag(&self) -> &str {
        &self.missing_flag
    }

    /// The flag attached to a value with `missing` components absent. A `{}`
    /// in the configured flag is replaced by the rounded count.
    pub fn flag_for(&self, missing: f64) -> String {
        if self.missing_flag.contains("{}") {
            let count = missing.round() as i64;
            self.missing_flag.replacen("{}", &count.to_string(), 1)
        } else {
            self.missing_flag.clone()
        }
    }

    /// Whether `flag` is the missing flag, whatever count was filled in.
    pub fn is_missing_flag(&self, flag: &str) -> bool {
        match self.missing_flag.split_once("{}") {
            Some((prefix, suffix)) => flag
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_suffix(suffix))
                .map_or(false, |count| count.chars().all(|c| c.is_ascii_digit())),
            None => flag == self.missing_flag,
        }
    }

    pub fn verdict(&self, missing: f64, total_components: f64) -> Verdict {
        verdict(missing, total_components, self.missing_allowed)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean() {
        assert_eq!(verdict(0.0, 6.0, 0.0), Verdict::Clean);
        assert_eq!(verdict(0.0, 0.25, 0.0), Verdict::Clean);
    }

    #[test]
    fn test_exact_threshold_is_flagged_not_void() {
        assert_eq!(verdict(3.0, 6.0, 0.5), Verdict::FlaggedPresent);
    }

    #[test]
    fn test_tolerance_absorbs_division_noise() {
        // 1/3 computed three different ways never lands exactly on the allowance.
        let missing = 1.0 - 2.0 / 3.0;
        assert_eq!(verdict(missing, 1.0, 1.0 / 3.0), Verdict::FlaggedPresent);
        assert_eq!(verdict(1.0, 3.0, 1.0 / 3.0 - 5e-6), Verdict::FlaggedPresent);
        assert_eq!(verdict(1.0, 3.0, 1.0 / 3.0 - 2e-5), Verdict::Void);
    }

    #[test]
    fn test_over_threshold_is_void() {
        assert_eq!(verdict(4.0, 6.0, 0.5), Verdict::Void);
        assert_eq!(verdict(0.5, 6.0, 0.0), Verdict::Void);
    }

    #[test]
    fn test_fully_missing_is_void_even_when_allowed() {
        assert_eq!(verdict(6.0, 6.0, 1.0), Verdict::Void);
        assert_eq!(verdict(0.5, 0.5, 1.0), Verdict::Void);
    }

    #[test]
    fn test_nearly_fully_missing_is_flagged_when_allowed() {
        assert_eq!(verdict(5.0, 6.0, 1.0), Verdict::FlaggedPresent);
    }

    #[test]
    fn test_negligible_missing_is_clean() {
        assert_eq!(verdict(1e-40, 6.0, 0.0), Verdict::Clean);
        assert_eq!(verdict(1e-30, 6.0, 0.0), Verdict::FlaggedPresent);
    }

    #[test]
    fn test_no_components_is_void() {
        assert_eq!(verdict(0.0, 0.0, 1.0), Verdict::Void);
        assert_eq!(verdict(0.0, f64::NAN, 1.0), Verdict::Void);
    }

    #[test]
    fn test_policy_validation() {
        assert!(MissingDataPolicy::new(0.0, "MISS").is_ok());
        assert!(MissingDataPolicy::new(1.0, "MISS").is_ok());
        assert!(MissingDataPolicy::new(1.01, "MISS").is_err());
        assert!(MissingDataPolicy::new(-0.01, "MISS").is_err());
        assert!(MissingDataPolicy::new(f64::NAN, "MISS").is_err());

        let policy = MissingDataPolicy::new(0.5, "MISS").unwrap();
        assert_eq!(policy.missing_flag(), "MISS");
        assert_eq!(policy.verdict(3.0, 6.0), Verdict::FlaggedPresent);
        assert_eq!(MissingDataPolicy::strict("M").verdict(1.0, 6.0), Verdict::Void);
    }

    #[test]
    fn test_flag_with_missing_count() {
        let plain = MissingDataPolicy::new(0.7, "MISS").unwrap();
        assert_eq!(plain.flag_for(4.0), "MISS");
        assert!(plain.is_missing_flag("MISS"));
        assert!(!plain.is_missing_flag("MISS4"));

        let counted = MissingDataPolicy::new(0.7, "MISSING{}").unwrap();
        assert_eq!(counted.flag_for(4.0), "MISSING4");
        assert_eq!(counted.flag_for(2.6), "MISSING3");
        assert!(counted.is_missing_flag("MISSING4"));
        assert!(counted.is_missing_flag("MISSING12"));
        assert!(!counted.is_missing_flag("MISSINGX"));
        assert!(!counted.is_missing_flag("RANGE"));
    }
}
