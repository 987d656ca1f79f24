//! Lenient decoding for loosely-typed step attributes.
//!
//! Step records arrive from a gateway that does not enforce types on any
//! attribute. Instead of rejecting a record, values are coerced so that the
//! step still participates in a stage.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserializes an ordering key, coercing anything non-numeric to `0`.
pub(crate) fn ordering_key<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map_or(0, coerce_i64))
}

/// Deserializes a boolean flag, coercing numbers and strings. Null is `false`.
pub(crate) fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    flag_or(deserializer, false)
}

/// Deserializes a boolean flag that is set unless stated otherwise.
pub(crate) fn required_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    flag_or(deserializer, true)
}

fn flag_or<'de, D>(deserializer: D, default: bool) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => default,
        Some(value) => coerce_bool(&value),
    })
}

/// Deserializes free text. Null and structured values become empty.
pub(crate) fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce_text).unwrap_or_default())
}

/// Deserializes a snake_case enum name, falling back to the default variant.
pub(crate) fn variant_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_variant).unwrap_or_default())
}

/// Deserializes a snake_case enum name, yielding `None` when unrecognized.
pub(crate) fn variant<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_variant))
}

/// Deserializes an optional hour count. Negative or non-numeric values are
/// dropped.
pub(crate) fn hours<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(coerce_u32))
}

/// Parses a snake_case enum name from a string value.
pub(crate) fn parse_variant<T: FromStr>(value: &Value) -> Option<T> {
    value.as_str().and_then(|name| name.trim().parse().ok())
}

/// Coerces a JSON value into an integer.
///
/// Floats truncate toward zero, numeric strings are parsed, booleans map to
/// `1`/`0` and everything else becomes `0`.
pub(crate) fn coerce_i64(value: &Value) -> i64 {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(truncate))
            .unwrap_or_default(),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().map(truncate))
                .unwrap_or_default()
        }
        Value::Bool(flag) => i64::from(*flag),
        Value::Null | Value::Array(_) | Value::Object(_) => 0,
    }
}

/// Coerces a JSON value into a boolean.
pub(crate) fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ),
        Value::Null | Value::Array(_) | Value::Object(_) => false,
    }
}

/// Coerces a JSON value into text. Numbers and booleans keep their literal
/// form.
pub(crate) fn coerce_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// Coerces a JSON value into a non-negative 32-bit count.
pub(crate) fn coerce_u32(value: &Value) -> Option<u32> {
    let number = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|n| n.is_finite()).map(truncate))?,
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().filter(|n| n.is_finite()).map(truncate))?
        }
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => return None,
    };
    u32::try_from(number).ok()
}

// NaN maps to 0, out-of-range values saturate.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}
