//! Date formatting with single-letter `Y-m-d H:i:s` style directives.
//!
//! Times carry no zone and are rendered as UTC. A backslash emits the next
//! character literally; characters that are not directives pass through.

use chrono::{Datelike, NaiveDateTime, Timelike};

use super::calendar::days_in_month;

pub const DEFAULT_DATETIME: &str = "Y-m-d H:i:s";
pub const DEFAULT_DATE: &str = "Y-m-d";
pub const ATOM: &str = "Y-m-d\\TH:i:sP";

pub fn format_date(at: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut chars = pattern.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(literal) = chars.next() {
                out.push(literal);
            }
            continue;
        }
        match directive(at, ch) {
            Some(text) => out.push_str(&text),
            None => out.push(ch),
        }
    }

    out
}

fn directive(at: &NaiveDateTime, ch: char) -> Option<String> {
    let hour12 = match at.hour() % 12 {
        0 => 12,
        h => h,
    };

    let text = match ch {
        // day
        'd' => format!("{:02}", at.day()),
        'D' => at.format("%a").to_string(),
        'j' => at.day().to_string(),
        'l' => at.format("%A").to_string(),
        'N' => at.weekday().number_from_monday().to_string(),
        'w' => at.weekday().num_days_from_sunday().to_string(),
        'z' => at.ordinal0().to_string(),
        'S' => ordinal_suffix(at.day()).to_string(),
        // week
        'W' => format!("{:02}", at.iso_week().week()),
        // month
        'F' => at.format("%B").to_string(),
        'm' => format!("{:02}", at.month()),
        'M' => at.format("%b").to_string(),
        'n' => at.month().to_string(),
        't' => days_in_month(at.year(), at.month()).to_string(),
        // year
        'L' => u8::from(days_in_month(at.year(), 2) == 29).to_string(),
        'o' => at.iso_week().year().to_string(),
        'Y' => at.year().to_string(),
        'y' => format!("{:02}", at.year().rem_euclid(100)),
        // time
        'a' => if at.hour() < 12 { "am" } else { "pm" }.to_string(),
        'A' => if at.hour() < 12 { "AM" } else { "PM" }.to_string(),
        'g' => hour12.to_string(),
        'G' => at.hour().to_string(),
        'h' => format!("{:02}", hour12),
        'H' => format!("{:02}", at.hour()),
        'i' => format!("{:02}", at.minute()),
        's' => format!("{:02}", at.second()),
        'u' => format!("{:06}", at.nanosecond() / 1_000),
        'v' => format!("{:03}", at.nanosecond() / 1_000_000),
        // zone
        'e' | 'T' => "UTC".to_string(),
        'P' | 'p' => "+00:00".to_string(),
        'O' => "+0000".to_string(),
        'Z' | 'I' => "0".to_string(),
        // full
        'c' => format_date(at, ATOM),
        'r' => format_date(at, "D, d M Y H:i:s O"),
        'U' => at.and_utc().timestamp().to_string(),
        _ => return None,
    };

    Some(text)
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 12, 3)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_default_format() {
        assert_eq!(format_date(&at(9, 5, 7), DEFAULT_DATETIME), "2025-12-03 09:05:07");
    }

    #[test]
    fn test_escapes_and_literals() {
        assert_eq!(format_date(&at(0, 0, 0), "\\Y: Y"), "Y: 2025");
        assert_eq!(format_date(&at(13, 0, 0), "g A"), "1 PM");
        assert_eq!(format_date(&at(0, 0, 0), "jS F"), "3rd December");
    }

    #[test]
    fn test_atom() {
        assert_eq!(format_date(&at(9, 0, 0), ATOM), "2025-12-03T09:00:00+00:00");
    }
}
