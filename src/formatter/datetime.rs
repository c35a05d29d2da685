use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::{Formatter, arg_str};
use crate::{
    temporal::format::{ATOM, DEFAULT_DATETIME, format_date},
    value::Value,
};

const DATE_INPUT: &[&str] = &["int", "string", "datetime"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormatter {
    ToTimeString,
    ToDateString,
    ToDateTime,
    ToUnixTime,
    ToIso8601,
    FormatDate,
}

impl DateFormatter {
    pub const ALL: [DateFormatter; 6] = [
        DateFormatter::ToTimeString,
        DateFormatter::ToDateString,
        DateFormatter::ToDateTime,
        DateFormatter::ToUnixTime,
        DateFormatter::ToIso8601,
        DateFormatter::FormatDate,
    ];
}

impl Formatter for DateFormatter {
    fn name(&self) -> &str {
        match self {
            DateFormatter::ToTimeString => "toTimeString",
            DateFormatter::ToDateString => "toDateString",
            DateFormatter::ToDateTime => "toDateTime",
            DateFormatter::ToUnixTime => "toUnixTime",
            DateFormatter::ToIso8601 => "toIso8601",
            DateFormatter::FormatDate => "formatDate",
        }
    }

    fn supported_types(&self) -> &[&str] {
        DATE_INPUT
    }

    fn format(&self, value: &Value, args: &[Value]) -> Result<Value, String> {
        if let (DateFormatter::ToUnixTime, Value::Integer(ts)) = (self, value) {
            return Ok(Value::Integer(*ts));
        }

        let at = to_datetime(value)?;
        let result = match self {
            DateFormatter::ToTimeString => format_date(&at, "H:i:s"),
            DateFormatter::ToDateString => format_date(&at, "Y-m-d"),
            DateFormatter::ToDateTime => format_date(&at, DEFAULT_DATETIME),
            DateFormatter::ToUnixTime => return Ok(Value::Integer(at.and_utc().timestamp())),
            DateFormatter::ToIso8601 => format_date(&at, ATOM),
            DateFormatter::FormatDate => format_date(&at, &arg_str(args, 0, DEFAULT_DATETIME)),
        };
        Ok(Value::String(result))
    }
}

/// Date-times pass through, integers are Unix timestamps and strings are
/// parsed as `Y-m-d H:i:s`, `Y-m-dTH:i:s`, RFC 3339 or a bare date.
pub(crate) fn to_datetime(value: &Value) -> Result<NaiveDateTime, String> {
    match value {
        Value::DateTime(at) => Ok(*at),
        Value::Integer(ts) => DateTime::from_timestamp(*ts, 0)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| format!("timestamp {} is out of range", ts)),
        Value::String(s) => parse_datetime(s.trim())
            .ok_or_else(|| format!("Failed to parse time string ({})", s)),
        other => Err(format!("cannot convert {} to a date", other.type_name())),
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.naive_utc()))
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
