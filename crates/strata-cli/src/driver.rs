//! Strata Driver - Batch Aggregation
//!
//! Runs every series of an aggregation configuration: reads the source
//! file, aggregates it onto the configured target step and writes the
//! target file. Failures are reported with the path of the offending
//! source file.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::format;
use chrono::NaiveDateTime;
use std::fmt;
use std::path::{Path, PathBuf};
use strata_common::config::parse_minutes_months;
use strata_common::{
    AggregateConfig, GeneralConfig, IncompleteSetting, Result, SeriesConfig, StrataError,
};
use strata_timeseries::{
    IncompleteMode, IntervalAggregator, IntervalType, MissingDataPolicy, Offset, TimeSeries,
    TimeStep,
};

// =============================================================================
// Configuration Mapping
// =============================================================================

/// The target step of a run, with the interval type of one series.
pub fn target_step(general: &GeneralConfig, interval_type: IntervalType) -> Result<TimeStep> {
    let (minutes, months) = parse_minutes_months(&general.target_step, "target_step")?;
    let (rounding_minutes, rounding_months) =
        parse_minutes_months(&general.timestamp_rounding, "timestamp_rounding")?;
    let (offset_minutes, offset_months) =
        parse_minutes_months(&general.timestamp_offset, "timestamp_offset")?;

    let step = TimeStep::from_minutes_months(minutes, months)?
        .with_nominal_offset(Offset::new(rounding_minutes, rounding_months))
        .with_actual_offset(Offset::new(offset_minutes, offset_months))
        .with_interval_type(interval_type);

    if general.target_timestamp_offset == 0 {
        Ok(step)
    } else {
        step.with_label_offset(general.target_timestamp_offset)
    }
}

pub fn missing_data_policy(general: &GeneralConfig) -> Result<MissingDataPolicy> {
    MissingDataPolicy::new(general.missing_allowed, general.missing_flag.clone())
}

pub fn incomplete_mode(setting: IncompleteSetting) -> IncompleteMode {
    match setting {
        IncompleteSetting::Strict => IncompleteMode::Strict,
        IncompleteSetting::Last => IncompleteMode::LastIncomplete,
        IncompleteSetting::All => IncompleteMode::AllIncomplete,
    }
}

// =============================================================================
// Reports
// =============================================================================

/// What happened to one configured series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesReport {
    pub source: PathBuf,
    pub target: PathBuf,
    pub source_points: usize,
    pub target_points: usize,
}

/// Descriptive statistics of a series file.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub path: PathBuf,
    pub time_step: Option<TimeStep>,
    pub count: usize,
    pub first: Option<NaiveDateTime>,
    pub last: Option<NaiveDateTime>,
    pub min: f64,
    pub max: f64,
    pub average: f64,
}

impl fmt::Display for SeriesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File:      {}", self.path.display())?;
        match &self.time_step {
            Some(step) => writeln!(f, "Time step: {}", step)?,
            None => writeln!(f, "Time step: -")?,
        }
        writeln!(f, "Records:   {}", self.count)?;
        if let (Some(first), Some(last)) = (self.first, self.last) {
            writeln!(
                f,
                "Period:    {} to {}",
                first.format(format::TIMESTAMP_FORMAT),
                last.format(format::TIMESTAMP_FORMAT)
            )?;
        }
        writeln!(f, "Minimum:   {}", format::format_value(self.min))?;
        writeln!(f, "Maximum:   {}", format::format_value(self.max))?;
        write!(f, "Average:   {}", format::format_value(self.average))
    }
}

/// Summarize the series stored at `path`.
pub fn inspect(path: impl AsRef<Path>) -> Result<SeriesSummary> {
    let path = path.as_ref();
    let series = format::read_file(path).map_err(|e| e.with_path(path))?;
    let (first, last) = series.bounding_dates().unzip();
    Ok(SeriesSummary {
        path: path.to_path_buf(),
        time_step: series.time_step,
        count: series.len(),
        first,
        last,
        min: series.min(None, None),
        max: series.max(None, None),
        average: series.average(None, None),
    })
}

// =============================================================================
// Driver
// =============================================================================

/// Executes the series of a validated configuration one after another.
pub struct Driver {
    config: AggregateConfig,
}

impl Driver {
    pub fn new(config: AggregateConfig) -> Self {
        Self { config }
    }

    /// Load and validate configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = AggregateConfig::from_file(path).map_err(|e| e.with_path(path))?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// Aggregate every configured series, stopping at the first failure.
    pub fn run(&self) -> Result<Vec<SeriesReport>> {
        let mut reports = Vec::with_capacity(self.config.series.len());
        for series in &self.config.series {
            let source = self.config.source_path(series);
            tracing::info!("Processing {}", source.display());
            let report = self
                .process(series)
                .map_err(|e| e.with_path(&source))?;
            reports.push(report);
        }
        Ok(reports)
    }

    /// Everything `run` does short of aggregating and writing.
    ///
    /// Returns the source files that were checked.
    pub fn check(&self) -> Result<Vec<PathBuf>> {
        let mut checked = Vec::with_capacity(self.config.series.len());
        for series in &self.config.series {
            let source = self.config.source_path(series);
            self.prepare(series)
                .map_err(|e| e.with_path(&source))?;
            tracing::info!("{} is ready for aggregation", source.display());
            checked.push(source);
        }
        Ok(checked)
    }

    /// Build the aggregator of a series and load its source.
    fn prepare(&self, series: &SeriesConfig) -> Result<(IntervalAggregator, TimeSeries)> {
        let general = &self.config.general;
        let interval_type = series.interval_type.parse::<IntervalType>()?;
        let aggregator =
            IntervalAggregator::new(target_step(general, interval_type)?, missing_data_policy(general)?)?
                .with_incomplete(incomplete_mode(general.incomplete));

        let source = format::read_file(self.config.source_path(series))?;
        match source.time_step {
            Some(step) => {
                step.require_nominal_offset()?;
            }
            None if source.is_empty() => {}
            None => {
                return Err(StrataError::Configuration(
                    "the source file has no Time_step header".to_string(),
                ))
            }
        }
        Ok((aggregator, source))
    }

    fn process(&self, series: &SeriesConfig) -> Result<SeriesReport> {
        let (aggregator, source) = self.prepare(series)?;
        let (result, missing) = aggregator.aggregate(&source)?;

        let total_missing: f64 = missing.iter().map(|p| p.value).sum();
        tracing::debug!(
            "{} values aggregated, {:.2} missing source components in total",
            result.len(),
            total_missing
        );

        let target = self.config.target_path(series);
        format::write_file(&target, &result)?;

        Ok(SeriesReport {
            source: self.config.source_path(series),
            target,
            source_points: source.len(),
            target_points: result.len(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
