//! Strata Time Series - Regularization Core
//!
//! Converts a regular time series from its native step to a coarser one,
//! such as ten-minute readings to hourly totals or daily values to monthly
//! means, while accounting precisely for missing source data.
//!
//! Key Features:
//! - Clock and calendar time steps with nominal and actual offsets
//! - Weighted-overlap aggregation for sum, average, extremes and bearings
//! - Configurable tolerance for missing data with flag propagation
//! - Incomplete edge buckets for series that are still being recorded
//!
//! @version 0.1.0
//! @author Strata Development Team

pub mod types;
pub mod timestep;
pub mod policy;
pub mod aggregation;

pub use types::{DataPoint, TimeSeries};
pub use timestep::{IntervalType, Offset, StepLength, TimeStep};
pub use policy::{MissingDataPolicy, Verdict, FULLY_MISSING_EPSILON, MISSING_TOLERANCE};
pub use aggregation::{aggregate, incomplete_thresholds, Bucket, IncompleteMode, IntervalAggregator};
