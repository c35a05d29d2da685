//! Weekday-of-month arithmetic.
//!
//! The nth occurrence of a weekday is `ceil(day_of_month / 7)`; the last
//! occurrence is one with no same weekday seven days later in the month.

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::error::SyntaxError;

/// Occurrence value meaning "last in the month".
pub const LAST: i64 = -1;

/// Day name (full or three-letter, any case) to number, 0 = Sunday.
pub fn day_number(day: &str) -> Result<u32, SyntaxError> {
    let day = day.trim().to_lowercase();
    let number = match day.as_str() {
        "sunday" | "sun" => 0,
        "monday" | "mon" => 1,
        "tuesday" | "tue" => 2,
        "wednesday" | "wed" => 3,
        "thursday" | "thu" => 4,
        "friday" | "fri" => 5,
        "saturday" | "sat" => 6,
        _ => return Err(SyntaxError::InvalidDay { day }),
    };
    Ok(number)
}

fn check_occurrence(occurrence: i64) -> Result<(), SyntaxError> {
    if occurrence == LAST || (1..=5).contains(&occurrence) {
        Ok(())
    } else {
        Err(SyntaxError::InvalidOccurrence { occurrence })
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// Whether `at` falls on the `occurrence`-th `day` of its month
/// (1-5, or [`LAST`]). Arguments are validated before the date is looked at.
pub fn is_nth_weekday(day: &str, occurrence: i64, at: &NaiveDateTime) -> Result<bool, SyntaxError> {
    let target = day_number(day)?;
    check_occurrence(occurrence)?;

    if at.weekday().num_days_from_sunday() != target {
        return Ok(false);
    }

    let day_of_month = at.day();
    if occurrence == LAST {
        return Ok(day_of_month + 7 > days_in_month(at.year(), at.month()));
    }

    Ok(i64::from(day_of_month.div_ceil(7)) == occurrence)
}

/// True when any of `occurrences` matches. An empty list never matches.
pub fn is_any_nth_weekday(
    day: &str,
    occurrences: &[i64],
    at: &NaiveDateTime,
) -> Result<bool, SyntaxError> {
    for &occurrence in occurrences {
        if is_nth_weekday(day, occurrence, at)? {
            return Ok(true);
        }
    }
    Ok(false)
}

pub fn is_last_weekday(day: &str, at: &NaiveDateTime) -> Result<bool, SyntaxError> {
    is_nth_weekday(day, LAST, at)
}
