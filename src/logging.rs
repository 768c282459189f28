//! Logging setup
//!
//! Progress goes to stderr and, without colours, to an append-only log file.

use crate::ScraperError;
use chrono::{DateTime, Local, TimeZone};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d at %H:%M:%S";

/// Local wall-clock timestamps for log lines
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTimestamp;

impl FormatTime for LogTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", format_timestamp(&Local::now()))
    }
}

/// Formats a timestamp the way it appears in the log
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Builds the log filter from the verbosity flags
pub fn build_filter(verbose: u8, quiet: bool) -> EnvFilter {
    if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("tululu_scraper=info,warn"),
            1 => EnvFilter::new("tululu_scraper=debug,info"),
            2 => EnvFilter::new("tululu_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    }
}

/// Sets up the tracing subscriber
///
/// # Arguments
///
/// * `verbose` - Number of `-v` flags
/// * `quiet` - Only log errors
/// * `log_path` - File the log lines are appended to
pub fn init(verbose: u8, quiet: bool, log_path: &Path) -> Result<(), ScraperError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(|source| ScraperError::Filesystem {
            path: log_path.to_path_buf(),
            source,
        })?;

    let console_layer = fmt::layer()
        .with_target(false)
        .with_timer(LogTimestamp)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(false)
        .with_timer(LogTimestamp)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(build_filter(verbose, quiet))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ScraperError::Logging(e.to_string()))
}
