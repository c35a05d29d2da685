use once_cell::sync::Lazy;
use regex::Regex;

use super::{Formatter, arg_int, arg_str, to_text};
use crate::value::Value;

const TEXT_INPUT: &[&str] = &["string", "int", "float"];

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9]+").expect("non-alphanumeric pattern"));
static LOWER_UPPER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z])([A-Z])").expect("case boundary pattern"));
static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormatter {
    Uppercase,
    Lowercase,
    Trim,
    Substr,
    Replace,
    Concat,
    Slug,
    Camel,
    Snake,
    Title,
}

impl StringFormatter {
    pub const ALL: [StringFormatter; 10] = [
        StringFormatter::Uppercase,
        StringFormatter::Lowercase,
        StringFormatter::Trim,
        StringFormatter::Substr,
        StringFormatter::Replace,
        StringFormatter::Concat,
        StringFormatter::Slug,
        StringFormatter::Camel,
        StringFormatter::Snake,
        StringFormatter::Title,
    ];
}

impl Formatter for StringFormatter {
    fn name(&self) -> &str {
        match self {
            StringFormatter::Uppercase => "uppercase",
            StringFormatter::Lowercase => "lowercase",
            StringFormatter::Trim => "trim",
            StringFormatter::Substr => "substr",
            StringFormatter::Replace => "replace",
            StringFormatter::Concat => "concat",
            StringFormatter::Slug => "slug",
            StringFormatter::Camel => "camel",
            StringFormatter::Snake => "snake",
            StringFormatter::Title => "title",
        }
    }

    fn supported_types(&self) -> &[&str] {
        TEXT_INPUT
    }

    fn format(&self, value: &Value, args: &[Value]) -> Result<Value, String> {
        let text = to_text(value);

        let result = match self {
            StringFormatter::Uppercase => text.to_uppercase(),
            StringFormatter::Lowercase => text.to_lowercase(),
            StringFormatter::Trim => text.trim().to_string(),
            StringFormatter::Substr => {
                let length = match args.get(1) {
                    None | Some(Value::Null) => None,
                    Some(_) => Some(arg_int(args, 1, 0)),
                };
                substr(&text, arg_int(args, 0, 0), length)
            }
            StringFormatter::Replace => {
                let search = arg_str(args, 0, "");
                if search.is_empty() {
                    text
                } else {
                    text.replace(&search, &arg_str(args, 1, ""))
                }
            }
            StringFormatter::Concat => match args.len() {
                0 => text,
                1 => format!("{}{}", text, arg_str(args, 0, "")),
                _ => format!("{}{}{}", arg_str(args, 0, ""), text, arg_str(args, 1, "")),
            },
            StringFormatter::Slug => slug(&text, &arg_str(args, 0, "-")),
            StringFormatter::Camel => camel(&text),
            StringFormatter::Snake => snake(&text),
            StringFormatter::Title => title(&text),
        };

        Ok(Value::String(result))
    }
}

/// Character-based substring; negative `start` / `length` count from the end.
fn substr(text: &str, start: i64, length: Option<i64>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len() as i64;

    let from = if start < 0 { (len + start).max(0) } else { start.min(len) };
    let to = match length {
        None => len,
        Some(l) if l < 0 => (len + l).max(from),
        Some(l) => (from + l).min(len),
    };

    if to <= from {
        return String::new();
    }
    chars[from as usize..to as usize].iter().collect()
}

fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let mapped = match ch {
            'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "A",
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
            'È' | 'É' | 'Ê' | 'Ë' => "E",
            'è' | 'é' | 'ê' | 'ë' => "e",
            'Ì' | 'Í' | 'Î' | 'Ï' => "I",
            'ì' | 'í' | 'î' | 'ï' => "i",
            'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "O",
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
            'Ù' | 'Ú' | 'Û' | 'Ü' => "U",
            'ù' | 'ú' | 'û' | 'ü' => "u",
            'Ñ' => "N",
            'ñ' => "n",
            'Ç' => "C",
            'ç' => "c",
            'ß' => "ss",
            'Æ' => "AE",
            'æ' => "ae",
            _ => {
                out.push(ch);
                continue;
            }
        };
        out.push_str(mapped);
    }
    out
}

fn slug(text: &str, separator: &str) -> String {
    let lowered = transliterate(text).to_lowercase();
    let replaced = NON_SLUG.replace_all(&lowered, separator);
    if separator.is_empty() {
        return replaced.into_owned();
    }
    replaced
        .trim_start_matches(separator)
        .trim_end_matches(separator)
        .to_string()
}

fn camel(text: &str) -> String {
    let mut words = NON_ALNUM.split(text).filter(|w| !w.is_empty());
    let Some(first) = words.next() else {
        return String::new();
    };

    let mut out = first.to_lowercase();
    for word in words {
        out.push_str(&capitalize(&word.to_lowercase()));
    }
    out
}

fn snake(text: &str) -> String {
    let split = LOWER_UPPER.replace_all(text, "${1}_${2}");
    let joined = NON_ALNUM.replace_all(&split, "_");
    joined.to_lowercase().trim_matches('_').to_string()
}

/// First letter of each word upper-cased, the rest lower-cased.
fn title(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for ch in text.chars() {
        if ch.is_alphanumeric() || ch == '\'' {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substr_negative() {
        assert_eq!(substr("Hello World", -5, None), "World");
        assert_eq!(substr("Hello World", 0, Some(-6)), "Hello");
        assert_eq!(substr("Héllo", 1, Some(3)), "éll");
        assert_eq!(substr("abc", 5, None), "");
    }

    #[test]
    fn test_case_conversions() {
        assert_eq!(camel("hello_world-foo"), "helloWorldFoo");
        assert_eq!(snake("helloWorld Foo"), "hello_world_foo");
        assert_eq!(title("hello wORLD"), "Hello World");
        assert_eq!(slug("Crème Brûlée!", "-"), "creme-brulee");
    }
}
