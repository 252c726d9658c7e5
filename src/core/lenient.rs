//! Forgiving numeric input.
//!
//! Household fields are typed by hand in a form, so they may reach us as JSON
//! numbers, numeric text, partially numeric text (`"12 years"`), empty strings
//! or nothing at all. Parsing takes the longest numeric prefix and never fails:
//! anything without a usable prefix becomes `None`, which callers turn into zero
//! or a documented fallback.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Flag(#[allow(dead_code)] bool),
    Missing(()),
}

impl RawNumber {
    fn to_amount(&self) -> Option<f64> {
        match self {
            RawNumber::Number(v) if v.is_finite() => Some(*v),
            RawNumber::Text(text) => parse_amount(text),
            _ => None,
        }
    }

    fn to_age(&self) -> Option<u32> {
        match self {
            RawNumber::Number(v) if v.is_finite() => Some(clamp_age(v.trunc() as i64)),
            RawNumber::Text(text) => parse_age(text),
            _ => None,
        }
    }
}

/// Parses the longest decimal prefix of `text` (sign, digits, fraction, exponent).
pub fn parse_amount(text: &str) -> Option<f64> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    trimmed[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Parses the leading integer of `text`; negative ages clamp to zero.
pub fn parse_age(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let bytes = trimmed.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    // Long digit runs overflow i64; treat them as "very old", not as garbage.
    let value = trimmed[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(clamp_age(value))
}

fn clamp_age(value: i64) -> u32 {
    value.clamp(0, i64::from(u32::MAX)) as u32
}

/// Serde adapter: amount, zero when missing or malformed.
pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_amount(deserializer)?.unwrap_or(0.0))
}

/// Serde adapter: amount, `None` when missing or malformed.
pub fn opt_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawNumber::deserialize(deserializer)
        .ok()
        .and_then(|raw| raw.to_amount()))
}

/// Serde adapter: whole-year age, zero when missing or malformed.
pub fn age<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_age(deserializer)?.unwrap_or(0))
}

/// Serde adapter: whole-year age, `None` when missing or malformed.
pub fn opt_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(RawNumber::deserialize(deserializer)
        .ok()
        .and_then(|raw| raw.to_age()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Field {
        #[serde(default, deserialize_with = "amount")]
        value: f64,
        #[serde(default, deserialize_with = "opt_age")]
        age: Option<u32>,
    }

    fn field(json: &str) -> Field {
        serde_json::from_str(json).expect("field json")
    }

    #[test]
    fn parse_amount_takes_numeric_prefix() {
        assert_eq!(parse_amount("3.5"), Some(3.5));
        assert_eq!(parse_amount("  12abc"), Some(12.0));
        assert_eq!(parse_amount(".5"), Some(0.5));
        assert_eq!(parse_amount("5."), Some(5.0));
        assert_eq!(parse_amount("-7.25kg"), Some(-7.25));
        assert_eq!(parse_amount("1e3"), Some(1000.0));
        assert_eq!(parse_amount("2e"), Some(2.0));
    }

    #[test]
    fn parse_amount_rejects_text_without_digits() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("-"), None);
        assert_eq!(parse_amount("."), None);
    }

    #[test]
    fn parse_age_truncates_and_clamps() {
        assert_eq!(parse_age("65"), Some(65));
        assert_eq!(parse_age("65.9"), Some(65));
        assert_eq!(parse_age("1e3"), Some(1));
        assert_eq!(parse_age("-4"), Some(0));
        assert_eq!(parse_age("x40"), None);
    }

    #[test]
    fn adapters_accept_numbers_text_and_garbage() {
        let p = field(r#"{"value": 120, "age": "45"}"#);
        assert_eq!(p.value, 120.0);
        assert_eq!(p.age, Some(45));

        let p = field(r#"{"value": "oops", "age": true}"#);
        assert_eq!(p.value, 0.0);
        assert_eq!(p.age, None);

        let p = field(r#"{"value": null}"#);
        assert_eq!(p.value, 0.0);
        assert_eq!(p.age, None);

        let p = field(r#"{"age": 61.7}"#);
        assert_eq!(p.age, Some(61));
    }
}
