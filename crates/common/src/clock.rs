//! Timing utilities for export logging and archive naming.

use std::time::Instant;

/// Measures elapsed wall time for structured log fields.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    /// Start measuring now.
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Milliseconds elapsed since start.
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Seconds elapsed since start.
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

/// Local time formatted for archive names (`YYYYMMDD-HHMMSS`).
pub fn archive_timestamp() -> String {
    format_archive_timestamp(&chrono::Local::now())
}

/// Format a given time the way [`archive_timestamp`] does.
pub fn format_archive_timestamp<Tz: chrono::TimeZone>(time: &chrono::DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%Y%m%d-%H%M%S").to_string()
}
