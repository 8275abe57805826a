//! Strata Time Step - Calendar and Clock Boundary Arithmetic
//!
//! A time step describes the cadence of a series: either a fixed number of
//! minutes or a whole number of calendar months. Boundaries are always a
//! month start shifted by the nominal offset, so stepping across months of
//! different lengths never overflows the day of the month.
//!
//! Each step carries two offsets. The nominal offset fixes the phase of the
//! labels (e.g. daily values stamped at 08:00). The actual offset converts a
//! label into the instant at which the interval it denotes really ends,
//! which is how interval-beginning and interval-ending conventions are told
//! apart.
//!
//! @version 0.1.0
//! @author Strata Development Team

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strata_common::config::parse_minutes_months;
use strata_common::{Result, StrataError};

// =============================================================================
// Interval Type
// =============================================================================

/// How the source values covering a target interval are reduced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalType {
    Sum,
    Average,
    Minimum,
    Maximum,
    /// Circular mean of bearings in degrees.
    VectorAverage,
    /// Copy the value stamped at the end of the interval.
    PassThrough,
}

impl IntervalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Average => "average",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
            Self::VectorAverage => "vector_average",
            Self::PassThrough => "pass_through",
        }
    }
}

impl fmt::Display for IntervalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IntervalType {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "average" | "mean" => Ok(Self::Average),
            "minimum" | "min" => Ok(Self::Minimum),
            "maximum" | "max" => Ok(Self::Maximum),
            "vector_average" => Ok(Self::VectorAverage),
            "pass_through" => Ok(Self::PassThrough),
            other => Err(StrataError::Configuration(format!(
                "{} is not a valid interval type",
                other
            ))),
        }
    }
}

// =============================================================================
// Offset
// =============================================================================

/// A shift expressed in minutes and calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    pub minutes: i64,
    pub months: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset {
        minutes: 0,
        months: 0,
    };

    pub fn new(minutes: i64, months: i32) -> Self {
        Self { minutes, months }
    }

    pub fn minutes(minutes: i64) -> Self {
        Self { minutes, months: 0 }
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.minutes, self.months)
    }
}

impl FromStr for Offset {
    type Err = StrataError;

    fn from_str(s: &str) -> Result<Self> {
        let (minutes, months) = parse_minutes_months(s, "offset")?;
        Ok(Self { minutes, months })
    }
}

// =============================================================================
// Step Length
// =============================================================================

/// The length of a step: clock minutes or calendar months, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepLength {
    FixedMinutes(u32),
    CalendarMonths(u32),
}

// =============================================================================
// Time Step
// =============================================================================

/// Sampling cadence of a series, with its phase and reporting convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeStep {
    length: StepLength,
    nominal_offset: Option<Offset>,
    actual_offset: Offset,
    interval_type: Option<IntervalType>,
}

impl TimeStep {
    /// A clock step of `length` minutes.
    pub fn minutes(length: u32) -> Result<Self> {
        if length == 0 {
            return Err(StrataError::InvalidTimeStep(
                "a step must have a nonzero length".to_string(),
            ));
        }
        Ok(Self::with_length(StepLength::FixedMinutes(length)))
    }

    /// A calendar step of `length` months.
    pub fn months(length: u32) -> Result<Self> {
        if length == 0 {
            return Err(StrataError::InvalidTimeStep(
                "a step must have a nonzero length".to_string(),
            ));
        }
        Ok(Self::with_length(StepLength::CalendarMonths(length)))
    }

    /// Build a step from the `"minutes,months"` pair of the file headers.
    pub fn from_minutes_months(minutes: i64, months: i32) -> Result<Self> {
        match (minutes, months) {
            (m, 0) if m > 0 => {
                let length = u32::try_from(m).map_err(|_| {
                    StrataError::InvalidTimeStep(format!("{} minutes is too long", m))
                })?;
                Self::minutes(length)
            }
            (0, m) if m > 0 => Self::months(m.unsigned_abs()),
            _ => Err(StrataError::InvalidTimeStep(format!(
                "\"{},{}\" is not an appropriate time step; one and only one of \
                 minutes and months must be positive",
                minutes, months
            ))),
        }
    }

    fn with_length(length: StepLength) -> Self {
        Self {
            length,
            nominal_offset: None,
            actual_offset: Offset::ZERO,
            interval_type: None,
        }
    }

    pub fn with_nominal_offset(mut self, offset: Offset) -> Self {
        self.nominal_offset = Some(offset);
        self
    }

    pub fn with_actual_offset(mut self, offset: Offset) -> Self {
        self.actual_offset = offset;
        self
    }

    pub fn with_interval_type(mut self, interval_type: IntervalType) -> Self {
        self.interval_type = Some(interval_type);
        self
    }

    /// Label each interval `minutes` before its actual end, leaving the
    /// intervals themselves where they are. A negative value labels after it.
    pub fn with_label_offset(mut self, minutes: i64) -> Result<Self> {
        let nominal = self.require_nominal_offset()?;
        self.nominal_offset = Some(Offset::new(nominal.minutes - minutes, nominal.months));
        self.actual_offset.minutes += minutes;
        Ok(self)
    }

    pub fn length(&self) -> StepLength {
        self.length
    }

    pub fn nominal_offset(&self) -> Option<Offset> {
        self.nominal_offset
    }

    pub fn actual_offset(&self) -> Offset {
        self.actual_offset
    }

    pub fn interval_type(&self) -> Option<IntervalType> {
        self.interval_type
    }

    /// The length as the `(minutes, months)` pair of the file headers.
    pub fn minutes_months(&self) -> (u32, u32) {
        match self.length {
            StepLength::FixedMinutes(m) => (m, 0),
            StepLength::CalendarMonths(m) => (0, m),
        }
    }

    /// The nominal offset, or a configuration error if it was never set.
    pub fn require_nominal_offset(&self) -> Result<Offset> {
        self.nominal_offset.ok_or_else(|| {
            StrataError::Configuration(format!(
                "time step {} has no nominal offset; boundary operations require one",
                self
            ))
        })
    }

    // =========================================================================
    // Boundary Snapping
    // =========================================================================

    /// Smallest boundary greater than or equal to `timestamp`.
    pub fn up(&self, timestamp: NaiveDateTime) -> Result<NaiveDateTime> {
        let nominal = self.require_nominal_offset()?;
        match self.length {
            StepLength::FixedMinutes(length) => {
                let length = i64::from(length);
                let (base, phase) = clock_phase(timestamp, length)?;
                let required = nominal.minutes.rem_euclid(length);
                let mut result = shift_minutes(base, required - phase)?;
                while result < timestamp {
                    result = shift_minutes(result, length)?;
                }
                Ok(result)
            }
            StepLength::CalendarMonths(length) => {
                let step = month_count(length)?;
                let year = timestamp.year() - 1;
                let mut month = 1 + nominal.months;
                let mut result = calendar_boundary(year, month, nominal.minutes)?;
                while result < timestamp {
                    month += step;
                    result = calendar_boundary(year, month, nominal.minutes)?;
                }
                Ok(result)
            }
        }
    }

    /// Largest boundary less than or equal to `timestamp`.
    pub fn down(&self, timestamp: NaiveDateTime) -> Result<NaiveDateTime> {
        let nominal = self.require_nominal_offset()?;
        match self.length {
            StepLength::FixedMinutes(length) => {
                let length = i64::from(length);
                let (base, phase) = clock_phase(timestamp, length)?;
                let required = nominal.minutes.rem_euclid(length);
                let mut result = shift_minutes(base, required - phase)?;
                while result > timestamp {
                    result = shift_minutes(result, -length)?;
                }
                Ok(result)
            }
            StepLength::CalendarMonths(length) => {
                let step = month_count(length)?;
                let year = timestamp.year() + 1;
                let mut month = 1 + nominal.months;
                let mut result = calendar_boundary(year, month, nominal.minutes)?;
                while result > timestamp {
                    month -= step;
                    result = calendar_boundary(year, month, nominal.minutes)?;
                }
                Ok(result)
            }
        }
    }

    /// The boundary one full step after `up(timestamp)`.
    pub fn next(&self, timestamp: NaiveDateTime) -> Result<NaiveDateTime> {
        let boundary = self.up(timestamp)?;
        self.advance(boundary, 1)
    }

    /// The boundary one full step before `down(timestamp)`.
    pub fn previous(&self, timestamp: NaiveDateTime) -> Result<NaiveDateTime> {
        let boundary = self.down(timestamp)?;
        self.advance(boundary, -1)
    }

    /// Move a boundary by `steps` whole steps.
    fn advance(&self, boundary: NaiveDateTime, steps: i32) -> Result<NaiveDateTime> {
        match self.length {
            StepLength::FixedMinutes(length) => {
                shift_minutes(boundary, i64::from(length) * i64::from(steps))
            }
            StepLength::CalendarMonths(length) => {
                let nominal = self.require_nominal_offset()?;
                let month_start = shift_minutes(boundary, -nominal.minutes)?;
                let month = month_start.month() as i32 + month_count(length)? * steps;
                calendar_boundary(month_start.year(), month, nominal.minutes)
            }
        }
    }

    // =========================================================================
    // Intervals
    // =========================================================================

    /// The instant at which the interval labelled `nominal` really ends.
    pub fn actual_timestamp(&self, nominal: NaiveDateTime) -> Result<NaiveDateTime> {
        let shifted = shift_months(nominal, self.actual_offset.months)?;
        shift_minutes(shifted, self.actual_offset.minutes)
    }

    /// Label of the interval whose actual window covers `timestamp`.
    ///
    /// The result `c` satisfies
    /// `actual_timestamp(previous(c)) < timestamp <= actual_timestamp(c)`.
    pub fn containing_interval(&self, timestamp: NaiveDateTime) -> Result<NaiveDateTime> {
        let mut result = self.down(timestamp)?;
        while self.actual_timestamp(result)? >= timestamp {
            result = self.previous(result)?;
        }
        while self.actual_timestamp(result)? < timestamp {
            result = self.next(result)?;
        }
        Ok(result)
    }

    /// The half-open window `[start, end)` represented by label `nominal`.
    pub fn interval_endpoints(
        &self,
        nominal: NaiveDateTime,
    ) -> Result<(NaiveDateTime, NaiveDateTime)> {
        let end = self.actual_timestamp(nominal)?;
        let start = self.actual_timestamp(self.previous(nominal)?)?;
        Ok((start, end))
    }
}

impl fmt::Display for TimeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (minutes, months) = self.minutes_months();
        write!(f, "{},{}", minutes, months)
    }
}

// =============================================================================
// Calendar Helpers
// =============================================================================

fn month_count(length: u32) -> Result<i32> {
    i32::try_from(length)
        .map_err(|_| StrataError::InvalidTimeStep(format!("{} months is too long", length)))
}

/// Whole-minute floor of `timestamp` and its minute phase within `length`,
/// counted from the start of its month.
fn clock_phase(timestamp: NaiveDateTime, length: i64) -> Result<(NaiveDateTime, i64)> {
    let base = timestamp
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .ok_or_else(|| StrataError::Calendar(format!("cannot truncate {}", timestamp)))?;
    let reference = month_start(base.year(), base.month() as i32)?;
    let phase = (base - reference).num_minutes().rem_euclid(length);
    Ok((base, phase))
}

/// Midnight of the first day of a month; `month` may fall outside 1..=12
/// and carries into the year.
fn month_start(year: i32, month: i32) -> Result<NaiveDateTime> {
    let total = i64::from(year) * 12 + i64::from(month) - 1;
    let out_of_range = || StrataError::Calendar(format!("year {} month {}", year, month));
    let normalized_year = i32::try_from(total.div_euclid(12)).map_err(|_| out_of_range())?;
    let normalized_month = (total.rem_euclid(12) + 1) as u32;
    NaiveDate::from_ymd_opt(normalized_year, normalized_month, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(out_of_range)
}

fn calendar_boundary(year: i32, month: i32, minutes: i64) -> Result<NaiveDateTime> {
    shift_minutes(month_start(year, month)?, minutes)
}

fn shift_minutes(timestamp: NaiveDateTime, minutes: i64) -> Result<NaiveDateTime> {
    Duration::try_minutes(minutes)
        .and_then(|delta| timestamp.checked_add_signed(delta))
        .ok_or_else(|| {
            StrataError::Calendar(format!("{} shifted by {} minutes", timestamp, minutes))
        })
}

fn shift_months(timestamp: NaiveDateTime, months: i32) -> Result<NaiveDateTime> {
    let shifted = if months >= 0 {
        timestamp.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        timestamp.checked_sub_months(Months::new(months.unsigned_abs()))
    };
    shifted.ok_or_else(|| {
        StrataError::Calendar(format!("{} shifted by {} months", timestamp, months))
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, 0))
            .expect("valid test timestamp")
    }

    fn daily() -> TimeStep {
        TimeStep::minutes(1440)
            .expect("valid step")
            .with_nominal_offset(Offset::minutes(480))
    }

    fn bimonthly() -> TimeStep {
        TimeStep::months(2)
            .expect("valid step")
            .with_nominal_offset(Offset::ZERO)
            .with_actual_offset(Offset::new(-1442, 2))
    }

    #[test]
    fn test_up() {
        assert_eq!(daily().up(dt(1964, 2, 29, 18, 35)).unwrap(), dt(1964, 3, 1, 8, 0));
        assert_eq!(daily().up(dt(1964, 3, 1, 7, 59)).unwrap(), dt(1964, 3, 1, 8, 0));
        assert_eq!(daily().up(dt(1964, 3, 1, 8, 0)).unwrap(), dt(1964, 3, 1, 8, 0));
        assert_eq!(bimonthly().up(dt(1964, 2, 29, 18, 35)).unwrap(), dt(1964, 3, 1, 0, 0));
        assert_eq!(bimonthly().up(dt(1963, 12, 31, 18, 35)).unwrap(), dt(1964, 1, 1, 0, 0));
    }

    #[test]
    fn test_down() {
        assert_eq!(daily().down(dt(1964, 2, 29, 18, 35)).unwrap(), dt(1964, 2, 29, 8, 0));
        assert_eq!(daily().down(dt(1964, 3, 1, 7, 59)).unwrap(), dt(1964, 2, 29, 8, 0));
        assert_eq!(daily().down(dt(1964, 3, 1, 8, 0)).unwrap(), dt(1964, 3, 1, 8, 0));
        assert_eq!(bimonthly().down(dt(1964, 2, 29, 18, 35)).unwrap(), dt(1964, 1, 1, 0, 0));
        assert_eq!(bimonthly().down(dt(1963, 12, 31, 18, 35)).unwrap(), dt(1963, 11, 1, 0, 0));
    }

    #[test]
    fn test_next() {
        assert_eq!(daily().next(dt(1964, 2, 29, 15, 12)).unwrap(), dt(1964, 3, 2, 8, 0));
        assert_eq!(daily().next(dt(1964, 3, 2, 8, 0)).unwrap(), dt(1964, 3, 3, 8, 0));
        assert_eq!(bimonthly().next(dt(1964, 2, 29, 15, 12)).unwrap(), dt(1964, 5, 1, 0, 0));
        assert_eq!(bimonthly().next(dt(1964, 5, 1, 0, 0)).unwrap(), dt(1964, 7, 1, 0, 0));
    }

    #[test]
    fn test_previous() {
        assert_eq!(daily().previous(dt(1964, 2, 29, 15, 12)).unwrap(), dt(1964, 2, 28, 8, 0));
        assert_eq!(daily().previous(dt(1964, 2, 29, 8, 0)).unwrap(), dt(1964, 2, 28, 8, 0));
        assert_eq!(bimonthly().previous(dt(1964, 2, 29, 15, 12)).unwrap(), dt(1963, 11, 1, 0, 0));
        assert_eq!(bimonthly().previous(dt(1963, 11, 1, 0, 0)).unwrap(), dt(1963, 9, 1, 0, 0));
    }

    #[test]
    fn test_month_carry_across_years() {
        let monthly = TimeStep::months(1).unwrap().with_nominal_offset(Offset::ZERO);
        assert_eq!(monthly.next(dt(1999, 12, 1, 0, 0)).unwrap(), dt(2000, 1, 1, 0, 0));
        assert_eq!(monthly.previous(dt(2000, 1, 1, 0, 0)).unwrap(), dt(1999, 12, 1, 0, 0));

        let hydrological_year = TimeStep::months(12)
            .unwrap()
            .with_nominal_offset(Offset::new(0, 9));
        assert_eq!(hydrological_year.up(dt(2003, 11, 5, 0, 0)).unwrap(), dt(2004, 10, 1, 0, 0));
        assert_eq!(hydrological_year.down(dt(2003, 11, 5, 0, 0)).unwrap(), dt(2003, 10, 1, 0, 0));
        assert_eq!(hydrological_year.next(dt(2003, 10, 1, 0, 0)).unwrap(), dt(2004, 10, 1, 0, 0));
    }

    #[test]
    fn test_month_end_offsets_do_not_drift() {
        // Stamped one day before each month start: the last day of the month.
        let monthly = TimeStep::months(1)
            .unwrap()
            .with_nominal_offset(Offset::minutes(-1440));
        assert_eq!(monthly.next(dt(2001, 1, 31, 0, 0)).unwrap(), dt(2001, 2, 28, 0, 0));
        assert_eq!(monthly.next(dt(2001, 2, 28, 0, 0)).unwrap(), dt(2001, 3, 31, 0, 0));
        assert_eq!(monthly.previous(dt(2001, 3, 31, 0, 0)).unwrap(), dt(2001, 2, 28, 0, 0));
    }

    #[test]
    fn test_negative_clock_offset() {
        let step = TimeStep::minutes(60).unwrap().with_nominal_offset(Offset::minutes(-10));
        assert_eq!(step.up(dt(2010, 5, 1, 0, 0)).unwrap(), dt(2010, 5, 1, 0, 50));
        assert_eq!(step.down(dt(2010, 5, 1, 0, 0)).unwrap(), dt(2010, 4, 30, 23, 50));
    }

    #[test]
    fn test_seconds_are_ignored_when_snapping() {
        let step = TimeStep::minutes(10).unwrap().with_nominal_offset(Offset::ZERO);
        let t = dt(2010, 5, 1, 0, 5) + Duration::seconds(30);
        assert_eq!(step.up(t).unwrap(), dt(2010, 5, 1, 0, 10));
        assert_eq!(step.down(t).unwrap(), dt(2010, 5, 1, 0, 0));
    }

    #[test]
    fn test_actual_timestamp() {
        assert_eq!(daily().actual_timestamp(dt(1964, 2, 29, 8, 0)).unwrap(), dt(1964, 2, 29, 8, 0));
        assert_eq!(
            bimonthly().actual_timestamp(dt(1964, 3, 1, 0, 0)).unwrap(),
            dt(1964, 4, 29, 23, 58)
        );
    }

    #[test]
    fn test_containing_interval() {
        assert_eq!(
            daily().containing_interval(dt(1964, 2, 29, 15, 12)).unwrap(),
            dt(1964, 3, 1, 8, 0)
        );
        assert_eq!(
            bimonthly().containing_interval(dt(1964, 2, 29, 15, 12)).unwrap(),
            dt(1964, 3, 1, 0, 0)
        );
        assert_eq!(
            bimonthly().containing_interval(dt(1964, 4, 18, 15, 12)).unwrap(),
            dt(1964, 3, 1, 0, 0)
        );
        // A timestamp exactly on an actual boundary belongs to the interval it ends.
        assert_eq!(
            daily().containing_interval(dt(1964, 3, 1, 8, 0)).unwrap(),
            dt(1964, 3, 1, 8, 0)
        );
    }

    #[test]
    fn test_interval_endpoints() {
        assert_eq!(
            bimonthly().interval_endpoints(dt(1964, 3, 1, 0, 0)).unwrap(),
            (dt(1964, 2, 28, 23, 58), dt(1964, 4, 29, 23, 58))
        );
    }

    #[test]
    fn test_label_offset_keeps_windows() {
        let hourly = TimeStep::minutes(60).unwrap().with_nominal_offset(Offset::ZERO);
        let earlier = hourly.with_label_offset(1).unwrap();
        assert_eq!(earlier.up(dt(2008, 2, 7, 9, 40)).unwrap(), dt(2008, 2, 7, 9, 59));
        assert_eq!(earlier.actual_timestamp(dt(2008, 2, 7, 9, 59)).unwrap(), dt(2008, 2, 7, 10, 0));
        assert_eq!(
            earlier.interval_endpoints(dt(2008, 2, 7, 9, 59)).unwrap(),
            hourly.interval_endpoints(dt(2008, 2, 7, 10, 0)).unwrap()
        );

        let later = hourly.with_label_offset(-1).unwrap();
        assert_eq!(later.up(dt(2008, 2, 7, 9, 40)).unwrap(), dt(2008, 2, 7, 10, 1));
        assert_eq!(
            later.interval_endpoints(dt(2008, 2, 7, 10, 1)).unwrap(),
            hourly.interval_endpoints(dt(2008, 2, 7, 10, 0)).unwrap()
        );
    }

    #[test]
    fn test_missing_nominal_offset() {
        let step = TimeStep::minutes(10).unwrap();
        let t = dt(2008, 2, 7, 9, 40);
        for result in [step.up(t), step.down(t), step.next(t), step.previous(t)] {
            assert!(matches!(result, Err(StrataError::Configuration(_))));
        }
        assert!(step.with_label_offset(1).is_err());
        // Offsets alone need no phase.
        assert_eq!(step.actual_timestamp(t).unwrap(), t);
    }

    #[test]
    fn test_from_minutes_months() {
        assert_eq!(
            TimeStep::from_minutes_months(60, 0).unwrap().length(),
            StepLength::FixedMinutes(60)
        );
        assert_eq!(
            TimeStep::from_minutes_months(0, 12).unwrap().length(),
            StepLength::CalendarMonths(12)
        );
        assert!(TimeStep::from_minutes_months(60, 1).is_err());
        assert!(TimeStep::from_minutes_months(0, 0).is_err());
        assert!(TimeStep::from_minutes_months(-10, 0).is_err());
        assert!(TimeStep::minutes(0).is_err());
        assert_eq!(TimeStep::months(3).unwrap().to_string(), "0,3");
    }

    #[test]
    fn test_interval_type_names() {
        assert_eq!("mean".parse::<IntervalType>().unwrap(), IntervalType::Average);
        assert_eq!("MAX".parse::<IntervalType>().unwrap(), IntervalType::Maximum);
        assert_eq!(
            "vector_average".parse::<IntervalType>().unwrap(),
            IntervalType::VectorAverage
        );
        assert!("median".parse::<IntervalType>().is_err());
        assert_eq!(IntervalType::PassThrough.to_string(), "pass_through");
    }

    #[test]
    fn test_offset_notation() {
        assert_eq!("-1442, 2".parse::<Offset>().unwrap(), Offset::new(-1442, 2));
        assert_eq!(Offset::new(480, 0).to_string(), "480,0");
        assert!("480".parse::<Offset>().is_err());
    }
}
