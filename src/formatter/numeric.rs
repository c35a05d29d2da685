use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive, prelude::ToPrimitive};

use super::{Formatter, arg_int, arg_str};
use crate::value::{Value, parse_numeric};

const NUMERIC_INPUT: &[&str] = &["int", "float", "string"];
const CAST_INPUT: &[&str] = &["int", "float", "string", "bool"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFormatter {
    ToInt,
    ToFloat,
    ToCents,
    FromCents,
    Round,
    Floor,
    Ceil,
    Number,
    Percent,
    Abs,
}

impl NumericFormatter {
    pub const ALL: [NumericFormatter; 10] = [
        NumericFormatter::ToInt,
        NumericFormatter::ToFloat,
        NumericFormatter::ToCents,
        NumericFormatter::FromCents,
        NumericFormatter::Round,
        NumericFormatter::Floor,
        NumericFormatter::Ceil,
        NumericFormatter::Number,
        NumericFormatter::Percent,
        NumericFormatter::Abs,
    ];
}

impl Formatter for NumericFormatter {
    fn name(&self) -> &str {
        match self {
            NumericFormatter::ToInt => "toInt",
            NumericFormatter::ToFloat => "toFloat",
            NumericFormatter::ToCents => "toCents",
            NumericFormatter::FromCents => "fromCents",
            NumericFormatter::Round => "round",
            NumericFormatter::Floor => "floor",
            NumericFormatter::Ceil => "ceil",
            NumericFormatter::Number => "number",
            NumericFormatter::Percent => "percent",
            NumericFormatter::Abs => "abs",
        }
    }

    fn supported_types(&self) -> &[&str] {
        match self {
            NumericFormatter::ToInt | NumericFormatter::ToFloat => CAST_INPUT,
            _ => NUMERIC_INPUT,
        }
    }

    fn format(&self, value: &Value, args: &[Value]) -> Result<Value, String> {
        let n = to_number(value);

        let result = match self {
            NumericFormatter::ToInt => Value::Integer(n.as_i64()),
            NumericFormatter::ToFloat => Value::Float(n.as_f64()),
            NumericFormatter::ToCents => match n {
                Number::Int(i) => i
                    .checked_mul(100)
                    .map(Value::Integer)
                    .ok_or("value out of range")?,
                Number::Float(f) => {
                    let cents = decimal(f * 100.0)?.round_dp_with_strategy(0, HALF_UP);
                    Value::Integer(cents.to_i64().ok_or("value out of range")?)
                }
            },
            NumericFormatter::FromCents => match n {
                Number::Int(i) if i % 100 == 0 => Value::Integer(i / 100),
                other => Value::Float(other.as_f64() / 100.0),
            },
            NumericFormatter::Round => Value::Float(round(n.as_f64(), arg_int(args, 0, 0))?),
            NumericFormatter::Floor => Value::Integer(n.as_f64().floor() as i64),
            NumericFormatter::Ceil => Value::Integer(n.as_f64().ceil() as i64),
            NumericFormatter::Number => Value::String(number_format(
                n.as_f64(),
                arg_int(args, 0, 2),
                &arg_str(args, 1, "."),
                &arg_str(args, 2, ","),
            )?),
            NumericFormatter::Percent => {
                let formatted = number_format(n.as_f64() * 100.0, arg_int(args, 0, 0), ".", ",")?;
                Value::String(format!("{}%", formatted))
            }
            NumericFormatter::Abs => match n {
                Number::Int(i) => i
                    .checked_abs()
                    .map(Value::Integer)
                    .unwrap_or(Value::Float((i as f64).abs())),
                Number::Float(f) => Value::Float(f.abs()),
            },
        };

        Ok(result)
    }
}

const HALF_UP: RoundingStrategy = RoundingStrategy::MidpointAwayFromZero;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub(crate) fn as_i64(self) -> i64 {
        match self {
            Number::Int(i) => i,
            Number::Float(f) => f as i64,
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }
}

/// Numbers pass through, numeric strings are parsed, booleans are 0/1 and
/// everything else is 0.
pub(crate) fn to_number(value: &Value) -> Number {
    match value {
        Value::Integer(i) => Number::Int(*i),
        Value::Float(f) => Number::Float(*f),
        Value::Boolean(b) => Number::Int(i64::from(*b)),
        Value::String(s) => match parse_numeric(s) {
            Some(Value::Float(f)) => Number::Float(f),
            Some(Value::Integer(i)) => Number::Int(i),
            _ => Number::Int(0),
        },
        _ => Number::Int(0),
    }
}

fn decimal(f: f64) -> Result<Decimal, String> {
    Decimal::from_f64(f).ok_or_else(|| format!("{} is not a representable number", f))
}

/// Half away from zero; negative precision rounds to tens, hundreds, ...
fn round(f: f64, precision: i64) -> Result<f64, String> {
    if precision < 0 {
        let scale = 10f64.powi(precision.unsigned_abs().min(308) as i32);
        return Ok((f / scale).round() * scale);
    }
    let dp = u32::try_from(precision.min(28)).unwrap_or(0);
    decimal(f)?
        .round_dp_with_strategy(dp, HALF_UP)
        .to_f64()
        .ok_or_else(|| "rounding overflow".to_string())
}

/// Fixed decimals with grouped thousands, e.g. `1,234.50`.
pub(crate) fn number_format(
    f: f64,
    decimals: i64,
    decimal_point: &str,
    thousands_sep: &str,
) -> Result<String, String> {
    let dp = u32::try_from(decimals.clamp(0, 28)).unwrap_or(0);
    let mut rounded = decimal(f)?.round_dp_with_strategy(dp, HALF_UP);
    rounded.rescale(dp);

    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, fr)) => (i.to_string(), Some(fr.to_string())),
        None => (text.clone(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::new();
    for (i, ch) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(thousands_sep);
        }
        grouped.push(*ch);
    }

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push_str(decimal_point);
        out.push_str(&frac);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_format_grouping() {
        assert_eq!(number_format(1234567.891, 2, ".", ",").unwrap(), "1,234,567.89");
        assert_eq!(number_format(1234.5, 0, ".", ",").unwrap(), "1,235");
        assert_eq!(number_format(-1234.5, 1, ",", ".").unwrap(), "-1.234,5");
        assert_eq!(number_format(12.0, 2, ".", ",").unwrap(), "12.00");
    }

    #[test]
    fn test_round_negative_precision() {
        assert_eq!(round(1234.0, -2).unwrap(), 1200.0);
        assert_eq!(round(2.5, 0).unwrap(), 3.0);
        assert_eq!(round(-2.5, 0).unwrap(), -3.0);
        assert_eq!(round(1.2345, 2).unwrap(), 1.23);
    }
}
