//! Lenient accessors over loosely typed CMS JSON.
//!
//! CMS documents carry numbers as strings, flags as strings or numbers, and
//! the same field under several names. These helpers read such values the
//! way the listing site always has: falsy or unparseable input collapses to
//! "absent" instead of failing.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::{Map, Value};

/// Returns the trimmed string if the value is a non-blank JSON string.
#[must_use]
pub fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Returns the first key of `keys` holding a non-null value.
#[must_use]
pub fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

/// Coerces a number or numeric string into a finite, non-zero `f64`.
///
/// Zero counts as absent so that `0` and `"0"` fall back to the caller's
/// default, matching how the listings have always been displayed.
#[must_use]
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok()?
        }
        _ => return None,
    };

    (number.is_finite() && number != 0.0).then_some(number)
}

/// Coerces the first usable number among `keys`.
#[must_use]
pub fn number_field(object: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find_map(coerce_number)
}

/// Coerces the first usable non-negative count among `keys`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn count_field(object: &Map<String, Value>, keys: &[&str]) -> Option<u32> {
    number_field(object, keys)
        .filter(|n| *n > 0.0)
        .map(|n| n.min(f64::from(u32::MAX)) as u32)
        .filter(|n| *n > 0)
}

/// Loose truthiness for CMS flags.
#[must_use]
pub fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_) | Value::Object(_)) => true,
    }
}

/// Returns true if any of `keys` is truthy.
#[must_use]
pub fn any_truthy(object: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|key| truthy(object.get(*key)))
}

/// Parses a CMS date: RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
#[must_use]
pub fn parse_cms_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
