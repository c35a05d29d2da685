use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use cron::Schedule;

use super::calendar;
use crate::error::SyntaxError;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Upper bound on schedule entries scanned when a `d#n` filter is active.
const MAX_SCAN: usize = 100_000;

/// A recurring schedule at minute resolution.
pub trait CronSchedule: fmt::Debug + Send + Sync {
    fn is_due(&self, at: &NaiveDateTime) -> bool;

    /// First run strictly after the minute containing `from`.
    fn next_run(&self, from: &NaiveDateTime) -> Option<NaiveDateTime>;

    /// Last run strictly before the minute containing `from`.
    fn previous_run(&self, from: &NaiveDateTime) -> Option<NaiveDateTime>;

    fn expression(&self) -> &str;
}

/// Five-field cron spec (`min hour dom month dow`) backed by the `cron` crate.
///
/// Day-of-week accepts 0-7 (0 and 7 are Sunday), names, and a single
/// `d#n` "nth weekday of the month" form. When both day-of-month and
/// day-of-week are restricted, a day matching either one is due.
#[derive(Debug, Clone)]
pub struct CronExpr {
    source: String,
    patterns: Vec<Pattern>,
}

/// One `cron` crate schedule plus the optional `d#n` occurrence filter.
#[derive(Debug, Clone)]
struct Pattern {
    schedule: Schedule,
    nth: Option<i64>,
}

impl Pattern {
    fn parse(fields: [&str; 5], nth: Option<i64>) -> Result<Self, String> {
        let widened = format!(
            "0 {} {} {} {} {}",
            fields[0],
            fields[1],
            fields[2],
            fields[3],
            day_of_week_names(fields[4])
        );
        let schedule = Schedule::from_str(&widened).map_err(|e| e.to_string())?;
        Ok(Pattern { schedule, nth })
    }

    fn matches_nth(&self, at: &NaiveDateTime) -> bool {
        match self.nth {
            Some(n) => i64::from(at.day().div_ceil(7)) == n,
            None => true,
        }
    }

    fn is_due(&self, at: &NaiveDateTime) -> bool {
        self.schedule.includes(Utc.from_utc_datetime(at)) && self.matches_nth(at)
    }

    fn next_run(&self, from: &NaiveDateTime) -> Option<NaiveDateTime> {
        self.schedule
            .after(&Utc.from_utc_datetime(from))
            .take(MAX_SCAN)
            .map(|dt| dt.naive_utc())
            .find(|dt| self.matches_nth(dt))
    }

    fn previous_run(&self, from: &NaiveDateTime) -> Option<NaiveDateTime> {
        self.schedule
            .after(&Utc.from_utc_datetime(from))
            .rev()
            .take(MAX_SCAN)
            .map(|dt| dt.naive_utc())
            .find(|dt| self.matches_nth(dt))
    }
}

impl CronExpr {
    pub fn parse(expression: &str) -> Result<Self, SyntaxError> {
        let source = expression.trim().to_string();
        let invalid = |reason: String| SyntaxError::InvalidCron {
            expression: source.clone(),
            reason,
        };

        if source.starts_with('@') {
            let schedule = Schedule::from_str(&source).map_err(|e| invalid(e.to_string()))?;
            return Ok(CronExpr {
                patterns: vec![Pattern {
                    schedule,
                    nth: None,
                }],
                source,
            });
        }

        let fields: Vec<&str> = source.split_whitespace().collect();
        let [minute, hour, day_of_month, month, day_of_week] = fields[..] else {
            return Err(invalid(format!(
                "Expected 5 fields, got {}",
                fields.len()
            )));
        };
        let (day_of_week, nth) = split_nth(day_of_week).map_err(invalid)?;

        let patterns = if is_restricted(day_of_month) && is_restricted(day_of_week) {
            vec![
                Pattern::parse([minute, hour, day_of_month, month, "*"], None),
                Pattern::parse([minute, hour, "*", month, day_of_week], nth),
            ]
        } else {
            vec![Pattern::parse(
                [minute, hour, day_of_month, month, day_of_week],
                nth,
            )]
        };
        let patterns = patterns
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        Ok(CronExpr { source, patterns })
    }
}

impl CronSchedule for CronExpr {
    fn is_due(&self, at: &NaiveDateTime) -> bool {
        let at = truncate_to_minute(at);
        self.patterns.iter().any(|pattern| pattern.is_due(&at))
    }

    fn next_run(&self, from: &NaiveDateTime) -> Option<NaiveDateTime> {
        let from = truncate_to_minute(from);
        self.patterns
            .iter()
            .filter_map(|pattern| pattern.next_run(&from))
            .min()
    }

    fn previous_run(&self, from: &NaiveDateTime) -> Option<NaiveDateTime> {
        let from = truncate_to_minute(from);
        self.patterns
            .iter()
            .filter_map(|pattern| pattern.previous_run(&from))
            .max()
    }

    fn expression(&self) -> &str {
        &self.source
    }
}

/// `m h * * d#n` for the `occurrence`-th `day` of each month at `time`.
pub fn nth_weekday_cron(day: &str, occurrence: i64, time: &str) -> Result<String, SyntaxError> {
    let day_number = calendar::day_number(day)?;
    if !(1..=5).contains(&occurrence) {
        return Err(SyntaxError::InvalidOccurrence { occurrence });
    }

    let (hours, minutes) = time.split_once(':').unwrap_or((time, "0"));
    let hours: u32 = hours.trim().parse().unwrap_or(0);
    let minutes: u32 = minutes.trim().parse().unwrap_or(0);

    Ok(format!(
        "{} {} * * {}#{}",
        minutes, hours, day_number, occurrence
    ))
}

fn truncate_to_minute(at: &NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(*at)
}

fn is_restricted(field: &str) -> bool {
    field != "*" && field != "?"
}

fn split_nth(field: &str) -> Result<(&str, Option<i64>), String> {
    let Some((day, n)) = field.split_once('#') else {
        return Ok((field, None));
    };
    match n.parse::<i64>() {
        Ok(n) if (1..=5).contains(&n) => Ok((day, Some(n))),
        _ => Err(format!("Invalid nth value \"{}\" in day-of-week field", n)),
    }
}

/// Rewrite numeric day-of-week values to names, since the `cron` crate
/// numbers Sunday as 1.
fn day_of_week_names(field: &str) -> String {
    field
        .split(',')
        .map(|item| {
            let (base, step) = match item.split_once('/') {
                Some((base, step)) => (base, Some(step)),
                None => (item, None),
            };
            let base = match base.split_once('-') {
                Some((from, to)) => {
                    let from = day_name(from);
                    if to == "7" && from != "Sun" {
                        format!("{}-Sat,Sun", from)
                    } else {
                        format!("{}-{}", from, day_name(to))
                    }
                }
                None => day_name(base),
            };
            match step {
                Some(step) => format!("{}/{}", base, step),
                None => base,
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}

fn day_name(value: &str) -> String {
    match value.parse::<usize>() {
        Ok(n) if n <= 7 => DAY_NAMES[n % 7].to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of_week_names() {
        assert_eq!(day_of_week_names("1-5"), "Mon-Fri");
        assert_eq!(day_of_week_names("0,6"), "Sun,Sat");
        assert_eq!(day_of_week_names("7"), "Sun");
        assert_eq!(day_of_week_names("*"), "*");
        assert_eq!(day_of_week_names("MON-FRI"), "MON-FRI");
        assert_eq!(day_of_week_names("3-7"), "Wed-Sat,Sun");
    }

    #[test]
    fn test_is_restricted() {
        assert!(!is_restricted("*"));
        assert!(!is_restricted("?"));
        assert!(is_restricted("1"));
        assert!(is_restricted("*/2"));
    }

    #[test]
    fn test_split_nth() {
        assert_eq!(split_nth("6#1"), Ok(("6", Some(1))));
        assert_eq!(split_nth("1-5"), Ok(("1-5", None)));
        assert!(split_nth("6#9").is_err());
    }
}
