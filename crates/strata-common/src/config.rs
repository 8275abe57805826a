//! Strata Config - Configuration Structures
//!
//! Configuration of a batch aggregation run. Loaded from a TOML file with a
//! `[general]` table that applies to every series and one `[[series]]` entry
//! per source/target file pair. Step and offset values use the
//! `"minutes,months"` notation of the time series file headers.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::error::{Result, StrataError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

// =============================================================================
// Incomplete Setting
// =============================================================================

/// How buckets at the edges of the source data are judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteSetting {
    /// Every bucket is judged against its full nominal coverage.
    #[default]
    Strict,
    /// The last bucket is judged only against the source data it has seen so far.
    Last,
    /// Both edge buckets are judged only against the source data they overlap.
    All,
}

// =============================================================================
// General Configuration
// =============================================================================

/// Settings shared by every series of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
    pub target_step: String,
    #[serde(default = "default_zero_offset")]
    pub timestamp_rounding: String,
    #[serde(default = "default_zero_offset")]
    pub timestamp_offset: String,
    /// Minutes by which output labels precede the end of their interval;
    /// windows are unaffected.
    #[serde(default)]
    pub target_timestamp_offset: i64,
    #[serde(default)]
    pub missing_allowed: f64,
    #[serde(default = "default_missing_flag")]
    pub missing_flag: String,
    #[serde(default)]
    pub incomplete: IncompleteSetting,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_zero_offset() -> String {
    "0,0".to_string()
}

fn default_missing_flag() -> String {
    "MISSING".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            target_step: "60,0".to_string(),
            timestamp_rounding: default_zero_offset(),
            timestamp_offset: default_zero_offset(),
            target_timestamp_offset: 0,
            missing_allowed: 0.0,
            missing_flag: default_missing_flag(),
            incomplete: IncompleteSetting::Strict,
            log_level: default_log_level(),
        }
    }
}

// =============================================================================
// Series Configuration
// =============================================================================

/// A single source/target pair to aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub source_file: PathBuf,
    pub target_file: PathBuf,
    pub interval_type: String,
}

// =============================================================================
// Aggregate Configuration
// =============================================================================

/// Top-level configuration of a batch aggregation run.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AggregateConfig {
    pub general: GeneralConfig,
    #[serde(default)]
    pub series: Vec<SeriesConfig>,
}

impl AggregateConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        content.parse()
    }

    /// Check value ranges and the notation of steps and offsets.
    pub fn validate(&self) -> Result<()> {
        let general = &self.general;

        if !general.missing_allowed.is_finite()
            || general.missing_allowed < 0.0
            || general.missing_allowed > 1.0
        {
            return Err(StrataError::Configuration(format!(
                "missing_allowed must be between 0 and 1, got {}",
                general.missing_allowed
            )));
        }

        let (minutes, months) = parse_minutes_months(&general.target_step, "target_step")?;
        if (minutes != 0) == (months != 0) {
            return Err(StrataError::InvalidTimeStep(format!(
                "\"{}\" is not an appropriate time step; use \"X,Y\" where X is minutes \
                 and Y is months; one and only one must be nonzero",
                general.target_step
            )));
        }
        if minutes < 0 || months < 0 {
            return Err(StrataError::InvalidTimeStep(format!(
                "\"{}\" must not be negative",
                general.target_step
            )));
        }

        parse_minutes_months(&general.timestamp_rounding, "timestamp_rounding")?;
        parse_minutes_months(&general.timestamp_offset, "timestamp_offset")?;

        validate_log_level(&general.log_level)?;

        if self.series.is_empty() {
            return Err(StrataError::Configuration(
                "no time series have been specified".to_string(),
            ));
        }

        Ok(())
    }

    /// Full path of a series' source file.
    pub fn source_path(&self, series: &SeriesConfig) -> PathBuf {
        self.general.base_dir.join(&series.source_file)
    }

    /// Full path of a series' target file.
    pub fn target_path(&self, series: &SeriesConfig) -> PathBuf {
        self.general.base_dir.join(&series.target_file)
    }
}

impl FromStr for AggregateConfig {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self> {
        let config: AggregateConfig =
            toml::from_str(s).map_err(|e| StrataError::Configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

/// Check a log level name, case-insensitively.
pub fn validate_log_level(level: &str) -> Result<()> {
    if LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
        Ok(())
    } else {
        Err(StrataError::Configuration(format!(
            "{} is not a valid log level",
            level
        )))
    }
}

/// Parse the `"minutes,months"` notation into its two integers.
pub fn parse_minutes_months(value: &str, name: &str) -> Result<(i64, i32)> {
    let invalid = || {
        StrataError::Configuration(format!(
            "\"{}\" is not an appropriate {}; use \"X,Y\" where X is minutes and Y is months",
            value, name
        ))
    };

    let mut parts = value.split(',');
    let minutes = parts.next().ok_or_else(invalid)?.trim();
    let months = parts.next().ok_or_else(invalid)?.trim();
    if parts.next().is_some() {
        return Err(invalid());
    }

    let minutes = minutes.parse::<i64>().map_err(|_| invalid())?;
    let months = months.parse::<i32>().map_err(|_| invalid())?;
    Ok((minutes, months))
}

// =============================================================================
// Tests
// =============================================================================
