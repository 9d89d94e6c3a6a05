//! Tolerant `serde_json::Value` helpers shared by the codec modules.
//!
//! Every helper returns `Option`/empty on malformed input; the codec
//! never fails on a bad tuple, it drops it.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

/// Split a tagged tuple into `(tag, payload)`. Returns `None` unless the
/// value is an array whose first element is an integer tag.
pub(crate) fn tuple_parts(v: &Value) -> Option<(i64, &[Value])> {
    let arr = v.as_array()?;
    let tag = arr.first()?.as_i64()?;
    Some((tag, &arr[1..]))
}

/// Parse a decimal operand. Accepts JSON integers, floats, and numeric
/// strings (legacy payloads store bare strings for some amounts).
pub(crate) fn decimal_from(v: &Value) -> Option<Decimal> {
    if let Some(i) = v.as_i64() {
        return Some(Decimal::from(i));
    }
    if let Some(f) = v.as_f64() {
        return Decimal::from_f64_retain(f);
    }
    v.as_str().and_then(|s| s.trim().parse().ok())
}

/// Emit a decimal as a plain JSON number, matching the legacy wire form.
/// Integral values come out without a fractional part.
pub(crate) fn decimal_to(d: Decimal) -> Value {
    if d.is_integer() {
        if let Some(i) = d.to_i64() {
            return Value::from(i);
        }
    }
    match d.to_f64().and_then(serde_json::Number::from_f64) {
        Some(n) => Value::Number(n),
        None => Value::String(d.to_string()),
    }
}

/// Parse an opaque identifier operand. Accepts strings and numbers
/// (older payloads stored numeric ids).
pub(crate) fn id_from(v: &Value) -> Option<String> {
    if let Some(s) = v.as_str() {
        return Some(s.to_string());
    }
    v.as_i64().map(|i| i.to_string())
}

/// Parse an id collection that may be a bare scalar or an array
/// (legacy payloads store a single id instead of a one-element array).
pub(crate) fn id_list(v: &Value) -> Vec<String> {
    match v.as_array() {
        Some(arr) => arr.iter().filter_map(id_from).collect(),
        None => id_from(v).into_iter().collect(),
    }
}

/// True when `s` is a valid ISO `YYYY-MM-DD` date.
pub(crate) fn is_iso_date(s: &str) -> bool {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    time::Date::parse(s, format).is_ok()
}

/// Parse an ISO date operand, rejecting anything `time` cannot parse.
pub(crate) fn iso_date_from(v: &Value) -> Option<String> {
    let s = v.as_str()?;
    if is_iso_date(s) {
        Some(s.to_string())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tuple_parts_requires_integer_tag() {
        assert_eq!(tuple_parts(&json!([2, 5, 50])).map(|(t, _)| t), Some(2));
        assert!(tuple_parts(&json!(["2", 5])).is_none());
        assert!(tuple_parts(&json!([])).is_none());
        assert!(tuple_parts(&json!({"tag": 2})).is_none());
    }

    #[test]
    fn decimal_round_trips_through_json_numbers() {
        let d = decimal_from(&json!(50)).unwrap();
        assert_eq!(decimal_to(d), json!(50));

        let d = decimal_from(&json!(12.75)).unwrap();
        assert_eq!(decimal_to(d), json!(12.75));

        let d = decimal_from(&json!("19.99")).unwrap();
        assert_eq!(decimal_to(d), json!(19.99));

        assert!(decimal_from(&json!(true)).is_none());
        assert!(decimal_from(&json!("not a number")).is_none());
    }

    #[test]
    fn id_list_accepts_scalar_and_array() {
        assert_eq!(id_list(&json!(["id_1", "id_2"])), vec!["id_1", "id_2"]);
        assert_eq!(id_list(&json!("id_1")), vec!["id_1"]);
        assert_eq!(id_list(&json!(42)), vec!["42"]);
        assert!(id_list(&json!(null)).is_empty());
        assert_eq!(id_list(&json!(["id_1", null, "id_2"])).len(), 2);
    }

    #[test]
    fn iso_date_validation() {
        assert!(is_iso_date("2024-01-15"));
        assert!(!is_iso_date("2024-13-01"));
        assert!(!is_iso_date("01/15/2024"));
        assert!(!is_iso_date(""));
        assert!(iso_date_from(&json!(20240115)).is_none());
    }
}
