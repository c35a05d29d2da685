use chrono::{NaiveDateTime, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SyntaxError;

static TIME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])$").expect("time pattern"));
static RANGE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01]?[0-9]|2[0-3]):([0-5][0-9])-([01]?[0-9]|2[0-3]):([0-5][0-9])$")
        .expect("time range pattern")
});

/// Daily window `[start, end)` at minute resolution.
///
/// A range whose start is later than its end wraps past midnight:
/// `22:00-06:00` contains 23:30 and 05:59 but not 06:00.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeRange {
    start: String,
    end: String,
    start_minutes: u32,
    end_minutes: u32,
}

impl TimeRange {
    pub fn new(start: &str, end: &str) -> Result<Self, SyntaxError> {
        let start_minutes = minutes(start)?;
        let end_minutes = minutes(end)?;
        Ok(TimeRange {
            start: start.to_string(),
            end: end.to_string(),
            start_minutes,
            end_minutes,
        })
    }

    /// Parse `H:MM-H:MM` (hours may be one or two digits).
    pub fn from_string(spec: &str) -> Result<Self, SyntaxError> {
        let spec = spec.trim();
        let caps = RANGE_PATTERN
            .captures(spec)
            .ok_or_else(|| SyntaxError::InvalidTimeRange {
                spec: spec.to_string(),
            })?;
        let part = |i: usize| caps[i].parse::<u32>().unwrap_or(0);

        TimeRange::new(
            &format!("{:02}:{:02}", part(1), part(2)),
            &format!("{:02}:{:02}", part(3), part(4)),
        )
    }

    /// Comma-separated list of ranges; blank entries are skipped.
    pub fn from_multiple(specs: &str) -> Result<Vec<Self>, SyntaxError> {
        specs
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(TimeRange::from_string)
            .collect()
    }

    pub fn any_contains(ranges: &[TimeRange], at: &NaiveDateTime) -> bool {
        ranges.iter().any(|range| range.contains(at))
    }

    pub fn contains(&self, at: &NaiveDateTime) -> bool {
        let current = at.hour() * 60 + at.minute();

        if self.is_overnight() {
            current >= self.start_minutes || current < self.end_minutes
        } else {
            current >= self.start_minutes && current < self.end_minutes
        }
    }

    pub fn is_overnight(&self) -> bool {
        self.start_minutes > self.end_minutes
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

fn minutes(time: &str) -> Result<u32, SyntaxError> {
    let caps = TIME_PATTERN
        .captures(time)
        .ok_or_else(|| SyntaxError::InvalidTimeRange {
            spec: time.to_string(),
        })?;
    let hours: u32 = caps[1].parse().unwrap_or(0);
    let mins: u32 = caps[2].parse().unwrap_or(0);
    Ok(hours * 60 + mins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_digit_hour_is_padded() {
        let range = TimeRange::from_string("8:00-18:30").unwrap();
        assert_eq!(range.start(), "08:00");
        assert_eq!(range.end(), "18:30");
    }

    #[test]
    fn test_minutes_rejects_bad_time() {
        assert!(minutes("24:00").is_err());
        assert!(minutes("12:60").is_err());
        assert_eq!(minutes("01:30").unwrap(), 90);
    }
}
