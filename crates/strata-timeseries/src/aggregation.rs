//! Strata Time Series Aggregation
//!
//! Weighted-overlap aggregation of a series onto a coarser time step.
//!
//! Every target interval is built from the source steps whose windows
//! overlap it. Each source step contributes in proportion to the share of
//! its own window that falls inside the target window, so source steps that
//! straddle a target boundary are split between the two targets instead of
//! being counted twice or dropped.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::policy::{MissingDataPolicy, Verdict};
use crate::timestep::{IntervalType, TimeStep};
use crate::types::{DataPoint, TimeSeries};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strata_common::{Result, StrataError};

// =============================================================================
// Incomplete Mode
// =============================================================================

/// Which buckets at the edges of the source data may be incomplete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncompleteMode {
    /// Every bucket is judged against its full nominal coverage.
    #[default]
    Strict,
    /// The last bucket is still filling; judge it only on what has been observed.
    LastIncomplete,
    /// Both edge buckets are judged only on the source span they overlap.
    AllIncomplete,
}

// =============================================================================
// Accumulator
// =============================================================================

/// Running reduction of one target interval.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Accumulator {
    Sum(f64),
    Average(f64),
    Maximum(f64),
    Minimum(f64),
    VectorAverage { cos: f64, sin: f64 },
    PassThrough(Option<f64>),
}

impl Accumulator {
    fn new(interval_type: IntervalType) -> Self {
        match interval_type {
            IntervalType::Sum => Self::Sum(0.0),
            IntervalType::Average => Self::Average(0.0),
            IntervalType::Maximum => Self::Maximum(f64::NEG_INFINITY),
            IntervalType::Minimum => Self::Minimum(f64::INFINITY),
            IntervalType::VectorAverage => Self::VectorAverage { cos: 0.0, sin: 0.0 },
            IntervalType::PassThrough => Self::PassThrough(None),
        }
    }

    /// Fold in a present value covering `weight` of its source step.
    fn add(&mut self, value: f64, weight: f64) {
        match self {
            Self::Sum(total) | Self::Average(total) => *total += value * weight,
            Self::Maximum(max) => {
                if weight > 0.0 {
                    *max = f64::max(*max, value);
                }
            }
            Self::Minimum(min) => {
                if weight > 0.0 {
                    *min = f64::min(*min, value);
                }
            }
            Self::VectorAverage { cos, sin } => {
                let radians = value.to_radians();
                *cos += radians.cos() * weight;
                *sin += radians.sin() * weight;
            }
            Self::PassThrough(last) => *last = Some(value),
        }
    }

    /// Record a source step without an observation.
    fn skip(&mut self) {
        if let Self::PassThrough(last) = self {
            *last = None;
        }
    }

    /// Final value given the total weight of the present points.
    fn value(&self, divider: f64) -> f64 {
        match *self {
            Self::Sum(total) | Self::Maximum(total) | Self::Minimum(total) => total,
            Self::Average(total) => total / divider,
            Self::VectorAverage { cos, sin } => normalize_bearing(sin.atan2(cos).to_degrees()),
            Self::PassThrough(last) => last.unwrap_or(f64::NAN),
        }
    }
}

/// Map an angle in degrees into `[0, 360)`.
fn normalize_bearing(degrees: f64) -> f64 {
    let mut result = degrees % 360.0;
    if result < 0.0 {
        result += 360.0;
    }
    if result >= 360.0 {
        result -= 360.0;
    }
    result
}

// =============================================================================
// Bucket
// =============================================================================

/// The outcome of aggregating one target interval.
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub nominal: NaiveDateTime,
    pub value: f64,
    pub flags: BTreeSet<String>,
    /// Weighted components without an observation.
    pub missing: f64,
    /// Weighted components with an observation.
    pub divider: f64,
    /// Weighted components the interval is judged against.
    pub total_components: f64,
    pub verdict: Verdict,
}

/// A source step and the share of its window inside a target window.
#[derive(Debug, Clone, Copy)]
struct Component {
    nominal: NaiveDateTime,
    pct_used: f64,
}

/// Source steps overlapping `[start, end)`, in order, with their weights.
fn components(
    source_step: &TimeStep,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Vec<Component>> {
    let start_nominal = source_step.containing_interval(start)?;
    let end_nominal = source_step.containing_interval(end)?;

    let mut result = Vec::new();
    let mut s = start_nominal;
    while s <= end_nominal {
        let (s_start, s_end) = source_step.interval_endpoints(s)?;
        let length = (s_end - s_start).num_seconds();
        if length <= 0 {
            return Err(StrataError::Calendar(format!(
                "source step at {} has an empty interval",
                s
            )));
        }
        let overlap = (s_end.min(end) - s_start.max(start)).num_seconds().max(0);
        result.push(Component {
            nominal: s,
            pct_used: overlap as f64 / length as f64,
        });
        s = source_step.next(s)?;
    }
    Ok(result)
}

// =============================================================================
// Incomplete Thresholds
// =============================================================================

/// Explicit component thresholds for the buckets `mode` treats as
/// incomplete, keyed by target nominal timestamp.
///
/// A bucket's threshold is the weight of its components whose source steps
/// lie within the source's bounding dates. Runs once, before the main walk.
pub fn incomplete_thresholds(
    source: &TimeSeries,
    target_step: &TimeStep,
    mode: IncompleteMode,
) -> Result<BTreeMap<NaiveDateTime, f64>> {
    let mut thresholds = BTreeMap::new();
    if mode == IncompleteMode::Strict {
        return Ok(thresholds);
    }
    let Some((first, last)) = source.bounding_dates() else {
        return Ok(thresholds);
    };
    let source_step = source_time_step(source)?;

    let mut edges = vec![target_step.containing_interval(source_step.actual_timestamp(last)?)?];
    if mode == IncompleteMode::AllIncomplete {
        edges.push(target_step.containing_interval(source_step.actual_timestamp(first)?)?);
    }

    for nominal in edges {
        let (start, end) = target_step.interval_endpoints(nominal)?;
        let explicit: f64 = components(&source_step, start, end)?
            .iter()
            .filter(|c| c.nominal >= first && c.nominal <= last)
            .map(|c| c.pct_used)
            .sum();
        tracing::debug!(
            "Bucket {} treated as incomplete with {:.4} explicit components",
            nominal,
            explicit
        );
        thresholds.insert(nominal, explicit);
    }

    Ok(thresholds)
}

fn source_time_step(source: &TimeSeries) -> Result<TimeStep> {
    let step = source.time_step.ok_or_else(|| {
        StrataError::Configuration("source series has no time step".to_string())
    })?;
    step.require_nominal_offset()?;
    Ok(step)
}

// =============================================================================
// Interval Aggregator
// =============================================================================

/// Aggregates series onto a target time step under a missing data policy.
#[derive(Debug, Clone)]
pub struct IntervalAggregator {
    target_step: TimeStep,
    interval_type: IntervalType,
    policy: MissingDataPolicy,
    incomplete: IncompleteMode,
}

impl IntervalAggregator {
    /// Fails if the target step cannot snap boundaries or has no interval type.
    pub fn new(target_step: TimeStep, policy: MissingDataPolicy) -> Result<Self> {
        target_step.require_nominal_offset()?;
        let interval_type = target_step.interval_type().ok_or_else(|| {
            StrataError::Configuration(format!(
                "target step {} has no interval type",
                target_step
            ))
        })?;
        Ok(Self {
            target_step,
            interval_type,
            policy,
            incomplete: IncompleteMode::Strict,
        })
    }

    pub fn with_incomplete(mut self, mode: IncompleteMode) -> Self {
        self.incomplete = mode;
        self
    }

    pub fn target_step(&self) -> &TimeStep {
        &self.target_step
    }

    pub fn policy(&self) -> &MissingDataPolicy {
        &self.policy
    }

    /// Aggregate `source`, returning the result series and the series of
    /// weighted missing components per result point.
    pub fn aggregate(&self, source: &TimeSeries) -> Result<(TimeSeries, TimeSeries)> {
        let mut result = self.output_series(source, "Aggregated");
        let mut missing = self.output_series(source, "Missing components of");

        let Some((first, last)) = source.bounding_dates() else {
            return Ok((result, missing));
        };
        let source_step = source_time_step(source)?;
        let thresholds = incomplete_thresholds(source, &self.target_step, self.incomplete)?;

        let start = self.target_step.previous(first)?;
        let end = self.target_step.next(last)?;

        let mut buckets = Vec::new();
        let mut d = start;
        while d <= end {
            buckets.push(self.bucket_with(source, &source_step, d, thresholds.get(&d).copied())?);
            d = self.target_step.next(d)?;
        }

        let computed = buckets.len();
        let voided = buckets.iter().filter(|b| b.verdict == Verdict::Void).count();

        // Void edge buckets come from partial coverage at the ends of the source.
        let head = buckets.iter().take_while(|b| b.value.is_nan()).count();
        let tail = buckets.iter().rev().take_while(|b| b.value.is_nan()).count();
        let kept = if head == computed {
            &buckets[..0]
        } else {
            &buckets[head..computed - tail]
        };

        let gaps = kept.iter().filter(|b| b.value.is_nan()).count();
        if gaps > 0 {
            tracing::warn!(
                "{} of {} aggregated values are void for lack of source data",
                gaps,
                kept.len()
            );
        }

        for bucket in kept {
            result.push(DataPoint {
                timestamp: bucket.nominal,
                value: bucket.value,
                flags: bucket.flags.clone(),
            })?;
            missing.push(DataPoint::new(bucket.nominal, bucket.missing))?;
        }

        tracing::debug!(
            "Aggregated {} source points into {} {} buckets ({} void, {} trimmed)",
            source.len(),
            result.len(),
            self.interval_type,
            voided,
            computed - kept.len()
        );

        Ok((result, missing))
    }

    /// Aggregate the single target interval labelled `nominal`.
    pub fn bucket(&self, source: &TimeSeries, nominal: NaiveDateTime) -> Result<Bucket> {
        let source_step = source_time_step(source)?;
        let threshold = incomplete_thresholds(source, &self.target_step, self.incomplete)?
            .get(&nominal)
            .copied();
        self.bucket_with(source, &source_step, nominal, threshold)
    }

    fn bucket_with(
        &self,
        source: &TimeSeries,
        source_step: &TimeStep,
        nominal: NaiveDateTime,
        explicit_components: Option<f64>,
    ) -> Result<Bucket> {
        let (start, end) = self.target_step.interval_endpoints(nominal)?;

        let mut accumulator = Accumulator::new(self.interval_type);
        let mut missing = 0.0;
        let mut total_components = 0.0;
        let mut divider = 0.0;
        let mut carries_flag = false;

        for component in components(source_step, start, end)? {
            let pct_used = component.pct_used;
            total_components += pct_used;
            match source.get(&component.nominal).filter(|p| !p.is_missing()) {
                Some(point) => {
                    divider += pct_used;
                    accumulator.add(point.value, pct_used);
                    let flagged = point.flags.iter().any(|f| self.policy.is_missing_flag(f));
                    if pct_used > 0.0 && flagged {
                        carries_flag = true;
                    }
                }
                None => {
                    missing += pct_used;
                    accumulator.skip();
                }
            }
        }

        if self.interval_type == IntervalType::PassThrough {
            // Only the value at the end of the interval matters.
            if accumulator.value(divider).is_nan() {
                missing = total_components;
            } else {
                missing = 0.0;
                divider = total_components;
            }
        }

        if let Some(explicit) = explicit_components {
            let unobserved = (total_components - explicit).max(0.0);
            missing = (missing - unobserved).max(0.0);
            total_components = explicit;
        }

        let verdict = self.policy.verdict(missing, total_components);
        let mut flags = BTreeSet::new();
        let value = match verdict {
            Verdict::Void => f64::NAN,
            Verdict::FlaggedPresent | Verdict::Clean => {
                if verdict == Verdict::FlaggedPresent || carries_flag {
                    flags.insert(self.policy.flag_for(missing));
                }
                accumulator.value(divider)
            }
        };

        Ok(Bucket {
            nominal,
            value,
            flags,
            missing,
            divider,
            total_components,
            verdict,
        })
    }

    fn output_series(&self, source: &TimeSeries, prefix: &str) -> TimeSeries {
        let title = if source.title.is_empty() {
            String::new()
        } else {
            format!("{} {}", prefix, source.title)
        };
        TimeSeries::new(self.target_step)
            .with_title(title)
            .with_unit(source.unit.clone())
            .with_timezone(source.timezone.clone())
    }
}

/// Aggregate `source` onto `target_step`, returning `(result, missing)`.
pub fn aggregate(
    source: &TimeSeries,
    target_step: &TimeStep,
    policy: &MissingDataPolicy,
) -> Result<(TimeSeries, TimeSeries)> {
    IntervalAggregator::new(*target_step, policy.clone())?.aggregate(source)
}

// =============================================================================
// Tests
// =============================================================================
