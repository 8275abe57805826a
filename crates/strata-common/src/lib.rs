//! Strata Common - Shared Types and Utilities
//!
//! Foundational error handling and configuration used across the Strata
//! time series aggregation crates.
//!
//! Key Features:
//! - Unified error type with user/system error classification
//! - Provenance wrapping for per-file failures
//! - TOML configuration for batch aggregation runs
//!
//! @version 0.1.0
//! @author Strata Development Team

pub mod config;
pub mod error;

pub use config::{AggregateConfig, GeneralConfig, IncompleteSetting, SeriesConfig};
pub use error::{Result, StrataError};
