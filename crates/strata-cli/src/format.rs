//! Strata File Format - Text Time Series Files
//!
//! Reads and writes the plain-text series format exchanged with the batch
//! driver. A file starts with `Name=Value` header lines, followed by a blank
//! line and one `YYYY-MM-DD HH:MM,value,flags` line per record. An empty
//! value marks a missing observation; flags are separated by spaces.
//!
//! Recognized headers: `Time_step`, `Timestamp_rounding` (or
//! `Nominal_offset`), `Timestamp_offset` (or `Actual_offset`),
//! `Interval_type`, `Unit`, `Title` and `Timezone`. Other headers are
//! skipped. A file whose first line is already a record has no header.
//!
//! @version 0.1.0
//! @author Strata Development Team

use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use strata_common::config::parse_minutes_months;
use strata_common::{Result, StrataError};
use strata_timeseries::{DataPoint, IntervalType, Offset, TimeSeries, TimeStep};

/// Timestamp layout of records.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

const LINE_ENDING: &str = "\r\n";
const DECIMALS: usize = 5;

// =============================================================================
// Value Formatting
// =============================================================================

/// Drop the zeros after the last significant decimal digit, and the decimal
/// point itself if nothing remains after it.
pub fn strip_trailing_zeros(s: &str) -> &str {
    match s.find('.') {
        Some(_) => s.trim_end_matches('0').trim_end_matches('.'),
        None => s,
    }
}

/// Format a value for a record line; missing values become empty.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return String::new();
    }
    let fixed = format!("{:.*}", DECIMALS, value);
    strip_trailing_zeros(&fixed).to_string()
}

// =============================================================================
// Reading
// =============================================================================

#[derive(Default)]
struct Header {
    time_step: Option<(i64, i32)>,
    nominal_offset: Option<Offset>,
    actual_offset: Option<Offset>,
    interval_type: Option<IntervalType>,
}

impl Header {
    fn time_step(&self) -> Result<Option<TimeStep>> {
        let Some((minutes, months)) = self.time_step else {
            return Ok(None);
        };
        let mut step = TimeStep::from_minutes_months(minutes, months)?;
        if let Some(offset) = self.nominal_offset {
            step = step.with_nominal_offset(offset);
        }
        if let Some(offset) = self.actual_offset {
            step = step.with_actual_offset(offset);
        }
        if let Some(interval_type) = self.interval_type {
            step = step.with_interval_type(interval_type);
        }
        Ok(Some(step))
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> StrataError {
    StrataError::Parse {
        line,
        message: message.into(),
    }
}

/// Split a header line into its lowercased name and its value.
fn header_line(line: &str, number: usize) -> Result<(String, String)> {
    let (name, value) = match line.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => (name.trim(), value.trim()),
        _ => return Err(parse_error(number, "invalid file header line")),
    };
    if name.chars().any(char::is_whitespace) {
        return Err(parse_error(number, "invalid file header line"));
    }
    Ok((name.to_ascii_lowercase(), value.to_string()))
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn record_line(line: &str, number: usize) -> Result<DataPoint> {
    let mut fields = line.splitn(3, ',');
    let timestamp = fields.next().unwrap_or_default().trim();
    let value = fields
        .next()
        .ok_or_else(|| parse_error(number, "expected \"date,value,flags\""))?
        .trim();
    let flags = fields.next().unwrap_or_default();

    let timestamp = parse_timestamp(timestamp)
        .ok_or_else(|| parse_error(number, format!("invalid timestamp \"{}\"", timestamp)))?;
    let value = if value.is_empty() {
        f64::NAN
    } else {
        value
            .parse::<f64>()
            .map_err(|_| parse_error(number, format!("invalid value \"{}\"", value)))?
    };

    Ok(DataPoint::new(timestamp, value).with_flags(flags.split_whitespace()))
}

/// Read a series from text in the file format.
pub fn read_series(reader: impl BufRead) -> Result<TimeSeries> {
    let mut lines = reader.lines().enumerate().peekable();
    let mut series = TimeSeries::default();
    let mut header = Header::default();

    let has_header = match lines.peek() {
        Some((_, Ok(first))) => first.contains('='),
        _ => false,
    };

    if has_header {
        for (index, line) in lines.by_ref() {
            let line = line?;
            let number = index + 1;
            if line.trim().is_empty() {
                break;
            }
            let (name, value) = header_line(&line, number)?;
            let as_offset = |value: &str| -> Result<Offset> {
                let (minutes, months) = parse_minutes_months(value, &name)
                    .map_err(|e| parse_error(number, e.to_string()))?;
                Ok(Offset::new(minutes, months))
            };
            match name.as_str() {
                "unit" => series.unit = value,
                "title" => series.title = value,
                "timezone" => series.timezone = value,
                "time_step" => {
                    let step = parse_minutes_months(&value, "time step")
                        .map_err(|e| parse_error(number, e.to_string()))?;
                    header.time_step = Some(step);
                }
                "timestamp_rounding" | "nominal_offset" => {
                    header.nominal_offset = Some(as_offset(&value)?);
                }
                "timestamp_offset" | "actual_offset" => {
                    header.actual_offset = Some(as_offset(&value)?);
                }
                "interval_type" if value.is_empty() => header.interval_type = None,
                "interval_type" => {
                    let interval_type = value
                        .parse::<IntervalType>()
                        .map_err(|_| parse_error(number, "invalid interval type"))?;
                    header.interval_type = Some(interval_type);
                }
                other => tracing::trace!("Skipping header {}", other),
            }
        }
    }

    series.time_step = header.time_step()?;

    for (index, line) in lines {
        let line = line?;
        let number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let point = record_line(line.trim(), number)?;
        series
            .push(point)
            .map_err(|e| parse_error(number, e.to_string()))?;
    }

    Ok(series)
}

/// Read a series file.
pub fn read_file(path: impl AsRef<Path>) -> Result<TimeSeries> {
    let file = File::open(path.as_ref())?;
    read_series(BufReader::new(file))
}

// =============================================================================
// Writing
// =============================================================================

/// Write a series, header included, in the file format.
pub fn write_series(mut writer: impl Write, series: &TimeSeries) -> Result<()> {
    write!(writer, "Version=2{}", LINE_ENDING)?;
    write!(writer, "Unit={}{}", series.unit, LINE_ENDING)?;
    write!(writer, "Count={}{}", series.len(), LINE_ENDING)?;
    write!(writer, "Title={}{}", series.title, LINE_ENDING)?;
    write!(writer, "Timezone={}{}", series.timezone, LINE_ENDING)?;
    if let Some(step) = &series.time_step {
        write!(writer, "Time_step={}{}", step, LINE_ENDING)?;
        if let Some(offset) = step.nominal_offset() {
            write!(writer, "Timestamp_rounding={}{}", offset, LINE_ENDING)?;
        }
        write!(writer, "Timestamp_offset={}{}", step.actual_offset(), LINE_ENDING)?;
        if let Some(interval_type) = step.interval_type() {
            write!(writer, "Interval_type={}{}", interval_type, LINE_ENDING)?;
        }
    }
    write!(writer, "{}", LINE_ENDING)?;

    for point in series.iter() {
        let flags: Vec<&str> = point.flags.iter().map(String::as_str).collect();
        write!(
            writer,
            "{},{},{}{}",
            point.timestamp.format(TIMESTAMP_FORMAT),
            format_value(point.value),
            flags.join(" "),
            LINE_ENDING
        )?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a series file, replacing any existing one.
pub fn write_file(path: impl AsRef<Path>, series: &TimeSeries) -> Result<()> {
    let file = File::create(path.as_ref())?;
    write_series(BufWriter::new(file), series)
}

// =============================================================================
// Tests
// =============================================================================
