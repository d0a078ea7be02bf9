// CollectLog - core/window.rs
//
// Derives the search window from the event time and a `<integer>[<unit>]`
// window specification such as `30[m]` or `4[h]`.

use crate::core::model::SearchWindow;
use crate::util::constants::{WINDOW_UNIT_CLOSE, WINDOW_UNIT_OPEN};
use crate::util::error::ConfigError;
use chrono::{Duration, NaiveDateTime};

/// Unit of a time window. Only the first character after `[` is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowUnit {
    Minutes,
    Hours,
}

impl WindowUnit {
    /// Map a unit code to a unit. `h`/`H` is hours; every other code,
    /// including `m`, falls back to minutes.
    pub fn from_code(code: char) -> Self {
        match code.to_ascii_lowercase() {
            'h' => WindowUnit::Hours,
            _ => WindowUnit::Minutes,
        }
    }
}

/// A parsed `<integer>[<unit>]` window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub magnitude: u32,
    pub unit: WindowUnit,
}

impl TimeWindow {
    /// Window length as a duration.
    pub fn duration(&self) -> Duration {
        let magnitude = i64::from(self.magnitude);
        match self.unit {
            WindowUnit::Minutes => Duration::minutes(magnitude),
            WindowUnit::Hours => Duration::hours(magnitude),
        }
    }
}

/// Parse a window specification.
///
/// Splits on `[`, reads the leading part as a non-negative integer and takes
/// the first character after `[` as the unit code. The closing `]` is not
/// required.
pub fn parse_time_window(spec: &str) -> Result<TimeWindow, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidTimeWindow {
        value: spec.to_string(),
        reason: reason.to_string(),
    };

    let (magnitude, rest) = spec
        .split_once(WINDOW_UNIT_OPEN)
        .ok_or_else(|| invalid("missing '[' before the unit"))?;

    let magnitude: u32 = magnitude
        .trim()
        .parse()
        .map_err(|_| invalid("quantity is not a non-negative integer"))?;

    let code = rest
        .chars()
        .next()
        .filter(|c| *c != WINDOW_UNIT_CLOSE)
        .ok_or_else(|| invalid("missing unit after '['"))?;

    Ok(TimeWindow {
        magnitude,
        unit: WindowUnit::from_code(code),
    })
}

/// Build the search window ending at `event_time`.
pub fn build_window(event_time: NaiveDateTime, spec: &str) -> Result<SearchWindow, ConfigError> {
    let window = parse_time_window(spec)?;
    let window_start = event_time
        .checked_sub_signed(window.duration())
        .ok_or_else(|| ConfigError::WindowOutOfRange {
            value: spec.to_string(),
        })?;

    let anchor_count = if window_start == event_time { 1 } else { 2 };

    tracing::debug!(
        event = %event_time,
        start = %window_start,
        anchor_count,
        "Search window built"
    );

    Ok(SearchWindow {
        event_time,
        window_start,
        anchor_count,
    })
}
