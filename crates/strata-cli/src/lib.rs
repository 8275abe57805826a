//! Strata CLI - Batch Aggregation Driver
//!
//! Library side of the `strata` command: the text file format of time
//! series and the driver that aggregates every series listed in a
//! configuration file.
//!
//! @version 0.1.0
//! @author Strata Development Team

pub mod driver;
pub mod format;

pub use driver::{inspect, Driver, SeriesReport, SeriesSummary};
pub use format::{read_file, read_series, write_file, write_series};
