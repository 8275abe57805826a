//! Strata Time Series Types
//!
//! Owned, append-only time series: an ordered map from timestamp to data
//! point, together with the series' native time step and descriptive
//! metadata.
//!
//! @version 0.1.0
//! @author Strata Development Team

use crate::timestep::TimeStep;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::ops::Bound;
use strata_common::{Result, StrataError};

// =============================================================================
// Data Point
// =============================================================================

/// A single observation. A NaN value means "no observation".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
    pub flags: BTreeSet<String>,
}

impl DataPoint {
    pub fn new(timestamp: NaiveDateTime, value: f64) -> Self {
        Self {
            timestamp,
            value,
            flags: BTreeSet::new(),
        }
    }

    /// A point with no observation.
    pub fn missing(timestamp: NaiveDateTime) -> Self {
        Self::new(timestamp, f64::NAN)
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flags.insert(flag.into());
        self
    }

    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    pub fn is_missing(&self) -> bool {
        self.value.is_nan()
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }
}

// =============================================================================
// Time Series
// =============================================================================

/// An ordered series with strictly increasing timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub time_step: Option<TimeStep>,
    pub title: String,
    pub unit: String,
    pub timezone: String,
    points: BTreeMap<NaiveDateTime, DataPoint>,
}

impl TimeSeries {
    pub fn new(time_step: TimeStep) -> Self {
        Self {
            time_step: Some(time_step),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Append a point; its timestamp must be later than the last one.
    pub fn push(&mut self, point: DataPoint) -> Result<()> {
        if let Some(last) = self.last() {
            if point.timestamp <= last.timestamp {
                return Err(StrataError::OutOfOrder(format!(
                    "cannot append {} after {}",
                    point.timestamp, last.timestamp
                )));
            }
        }
        self.points.insert(point.timestamp, point);
        Ok(())
    }

    /// Append a plain value without flags.
    pub fn push_value(&mut self, timestamp: NaiveDateTime, value: f64) -> Result<()> {
        self.push(DataPoint::new(timestamp, value))
    }

    /// Append every point of `other`, which must start after this series ends.
    pub fn append(&mut self, other: TimeSeries) -> Result<()> {
        if let (Some(last), Some(first)) = (self.last(), other.first()) {
            if first.timestamp <= last.timestamp {
                return Err(StrataError::OutOfOrder(format!(
                    "cannot append: the first record ({}) of the series to append is not \
                     later than the last record ({})",
                    first.timestamp, last.timestamp
                )));
            }
        }
        self.points.extend(other.points);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, timestamp: &NaiveDateTime) -> Option<&DataPoint> {
        self.points.get(timestamp)
    }

    /// The value at `timestamp`, NaN when there is no record.
    pub fn value_at(&self, timestamp: &NaiveDateTime) -> f64 {
        self.points.get(timestamp).map_or(f64::NAN, |p| p.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DataPoint> {
        self.points.values()
    }

    pub fn timestamps(&self) -> impl Iterator<Item = &NaiveDateTime> {
        self.points.keys()
    }

    pub fn first(&self) -> Option<&DataPoint> {
        self.points.values().next()
    }

    pub fn last(&self) -> Option<&DataPoint> {
        self.points.values().next_back()
    }

    /// First and last timestamps, if the series is not empty.
    pub fn bounding_dates(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        Some((self.first()?.timestamp, self.last()?.timestamp))
    }

    /// The record at `timestamp`, or else the nearest one after it
    /// (before it, when `downwards` is set).
    pub fn item(&self, timestamp: NaiveDateTime, downwards: bool) -> Option<&DataPoint> {
        if downwards {
            self.points
                .range((Bound::Unbounded, Bound::Included(timestamp)))
                .next_back()
                .map(|(_, p)| p)
        } else {
            self.points
                .range((Bound::Included(timestamp), Bound::Unbounded))
                .next()
                .map(|(_, p)| p)
        }
    }

    /// Points with `start <= timestamp <= end`; `None` means the series bound.
    /// An inverted span yields nothing.
    pub fn range(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> impl Iterator<Item = &DataPoint> {
        let inverted = matches!((start, end), (Some(start), Some(end)) if start > end);
        let lower = start.map_or(Bound::Unbounded, Bound::Included);
        let upper = end.map_or(Bound::Unbounded, Bound::Included);
        let points = if inverted {
            None
        } else {
            Some(self.points.range((lower, upper)))
        };
        points.into_iter().flatten().map(|(_, p)| p)
    }

    fn present_values(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> impl Iterator<Item = f64> + '_ {
        self.range(start, end)
            .map(|p| p.value)
            .filter(|v| !v.is_nan())
    }

    /// Smallest observation in the range, NaN if there is none.
    pub fn min(&self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> f64 {
        self.present_values(start, end).fold(f64::NAN, f64::min)
    }

    /// Largest observation in the range, NaN if there is none.
    pub fn max(&self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> f64 {
        self.present_values(start, end).fold(f64::NAN, f64::max)
    }

    /// Mean of the observations in the range, NaN if there is none.
    pub fn average(&self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> f64 {
        let (sum, count) = self
            .present_values(start, end)
            .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            f64::NAN
        } else {
            sum / count as f64
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .and_then(|date| date.and_hms_opt(h, mi, 0))
            .expect("valid test timestamp")
    }

    fn sample() -> TimeSeries {
        let mut ts = TimeSeries::default();
        let rows = [
            (dt(2004, 8, 18, 18, 53), 93.0, None),
            (dt(2004, 8, 19, 19, 52), 108.7, None),
            (dt(2004, 8, 20, 23, 59), 28.3, Some("HEARTS")),
            (dt(2004, 8, 21, 0, 2), f64::NAN, None),
            (dt(2004, 8, 22, 0, 2), f64::NAN, Some("DIAMONDS")),
        ];
        for (timestamp, value, flag) in rows {
            let point = DataPoint::new(timestamp, value).with_flags(flag);
            ts.push(point).expect("increasing timestamps");
        }
        ts
    }

    #[test]
    fn test_data_point() {
        let point = DataPoint::missing(dt(2008, 2, 7, 9, 40)).with_flag("RANGE");
        assert!(point.is_missing());
        assert!(point.has_flag("RANGE"));
        assert!(!point.has_flag("SPADE"));
    }

    #[test]
    fn test_push_rejects_out_of_order() {
        let mut ts = sample();
        let err = ts
            .push_value(dt(2004, 8, 22, 0, 2), 1.0)
            .expect_err("duplicate timestamp");
        assert!(matches!(err, StrataError::OutOfOrder(_)));
        assert!(ts.push_value(dt(2004, 8, 1, 0, 0), 1.0).is_err());
        assert_eq!(ts.len(), 5);
    }

    #[test]
    fn test_append() {
        let mut ts = sample();
        let mut later = TimeSeries::default();
        later.push_value(dt(2005, 1, 1, 0, 0), 4.0).unwrap();
        ts.append(later).unwrap();
        assert_eq!(ts.len(), 6);

        let mut earlier = TimeSeries::default();
        earlier.push_value(dt(2004, 1, 1, 0, 0), 4.0).unwrap();
        assert!(ts.append(earlier).is_err());
    }

    #[test]
    fn test_bounding_dates() {
        assert_eq!(TimeSeries::default().bounding_dates(), None);
        assert_eq!(
            sample().bounding_dates(),
            Some((dt(2004, 8, 18, 18, 53), dt(2004, 8, 22, 0, 2)))
        );
    }

    #[test]
    fn test_value_at() {
        let ts = sample();
        assert_eq!(ts.value_at(&dt(2004, 8, 19, 19, 52)), 108.7);
        assert!(ts.value_at(&dt(2004, 8, 21, 0, 2)).is_nan());
        assert!(ts.value_at(&dt(2000, 1, 1, 0, 0)).is_nan());
    }

    #[test]
    fn test_item_lookup() {
        let ts = sample();
        let exact = ts.item(dt(2004, 8, 19, 19, 52), false).unwrap();
        assert_eq!(exact.value, 108.7);
        let after = ts.item(dt(2004, 8, 19, 0, 0), false).unwrap();
        assert_eq!(after.timestamp, dt(2004, 8, 19, 19, 52));
        let before = ts.item(dt(2004, 8, 20, 0, 0), true).unwrap();
        assert_eq!(before.timestamp, dt(2004, 8, 19, 19, 52));
        let last = ts.item(dt(2004, 8, 22, 0, 2), false).unwrap();
        assert!(last.is_missing());
        assert!(last.has_flag("DIAMONDS"));

        assert!(ts.item(dt(2004, 8, 22, 0, 3), false).is_none());
        assert!(ts.item(dt(2004, 8, 18, 18, 52), true).is_none());
    }

    #[test]
    fn test_min_max_average() {
        let ts = sample();
        let start = Some(dt(2004, 8, 18, 0, 0));
        let end = Some(dt(2004, 8, 22, 0, 0));
        assert!((ts.min(start, end) - 28.3).abs() < 1e-9);
        assert!((ts.max(start, end) - 108.7).abs() < 1e-9);
        assert!((ts.average(start, end) - 76.66666666667).abs() < 1e-9);
        assert!((ts.average(None, None) - 76.66666666667).abs() < 1e-9);
    }

    #[test]
    fn test_min_max_average_without_observations() {
        let ts = sample();
        let start = Some(dt(2004, 8, 21, 0, 0));
        let end = Some(dt(2004, 8, 22, 12, 0));
        assert!(ts.min(start, end).is_nan());
        assert!(ts.max(start, end).is_nan());
        assert!(ts.average(start, end).is_nan());
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let ts = sample();
        let start = Some(dt(2004, 8, 20, 0, 0));
        let end = Some(dt(2004, 8, 19, 0, 0));
        assert_eq!(ts.range(start, end).count(), 0);
        assert!(ts.min(start, end).is_nan());
        assert!(ts.max(start, end).is_nan());
        assert!(ts.average(start, end).is_nan());
    }
}
