//! Tolerant field decoders for backend payloads.
//!
//! The API serializes Django `DecimalField`s as strings, counters as numbers or
//! strings depending on the endpoint, and leaves many fields `null`. These
//! helpers absorb those variations so the typed models never need to.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::str::FromStr;
use tracing::debug;

/// Parse a decimal out of a JSON number or numeric string.
#[must_use]
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => {
            let parsed = parse_decimal(text);
            if parsed.is_none() && !text.trim().is_empty() {
                debug!(value = %text, "unparseable decimal treated as absent");
            }
            parsed
        }
        _ => None,
    }
}

/// Parse a decimal from free text, accepting plain and scientific notation.
#[must_use]
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Decode an optional decimal from a number, numeric string or `null`.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(decimal_from_value))
}

/// Decode a decimal, substituting zero for anything unusable.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn decimal_or_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(decimal(deserializer)?.unwrap_or_default())
}

/// Decode an optional float from a number or numeric string.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    })
}

/// Decode a count, treating missing or malformed values as zero.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(number)) => number
            .as_u64()
            .or_else(|| number.as_f64().map(|f| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let rounded = f.max(0.0).round() as u64;
                rounded
            }))
            .unwrap_or_default(),
        Some(Value::String(text)) => text.trim().parse().unwrap_or_else(|_| {
            debug!(value = %text, "malformed count treated as zero");
            0
        }),
        _ => 0,
    })
}

/// Decode an optional 0–100 percentage, clamping out-of-range values.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn percent<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(float(deserializer)?.map(|value| {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let clamped = value.clamp(0.0, 100.0).round() as u8;
        clamped
    }))
}

/// Decode an identifier that may arrive as an integer or a string.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_id(deserializer)?.unwrap_or_default())
}

/// Optional variant of [`id`].
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) if !text.is_empty() => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Decode a string, mapping `null` to empty.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => text,
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    })
}

/// Decode a boolean, mapping `null` to `false`.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(flag)) => flag,
        Some(Value::Number(number)) => number.as_i64().is_some_and(|n| n != 0),
        Some(Value::String(text)) => matches!(text.as_str(), "true" | "True" | "1"),
        _ => false,
    })
}

/// Decode any value, substituting `T::default()` for `null` or a mismatched shape.
///
/// # Errors
/// Only fails when the underlying deserializer cannot produce a JSON value.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|value| {
            serde_json::from_value(value)
                .inspect_err(|err| debug!("unexpected shape replaced by default: {err}"))
                .ok()
        })
        .unwrap_or_default())
}

/// Decode a list, mapping `null` to empty.
///
/// # Errors
/// Fails when a list element does not match `T`.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "decimal")]
        amount: Option<Decimal>,
        #[serde(default, deserialize_with = "count")]
        total: u64,
        #[serde(default, deserialize_with = "id")]
        id: String,
        #[serde(default, deserialize_with = "flag")]
        active: bool,
        #[serde(default, deserialize_with = "string")]
        label: String,
    }

    /// Decimal strings and numbers decode to the same value
    #[test]
    fn test_decimal_string_and_number() {
        let from_text: Sample = serde_json::from_value(json!({"amount": "1234.50"})).unwrap();
        let from_number: Sample = serde_json::from_value(json!({"amount": 1234.5})).unwrap();
        assert_eq!(from_text.amount, Some(Decimal::new(123_450, 2)));
        assert_eq!(from_text.amount, from_number.amount);
    }

    /// Null and garbage decode to defaults instead of failing
    #[test]
    fn test_nulls_and_garbage() {
        let sample: Sample = serde_json::from_value(json!({
            "amount": null,
            "total": "abc",
            "id": null,
            "active": null,
            "label": null
        }))
        .unwrap();
        assert_eq!(sample.amount, None);
        assert_eq!(sample.total, 0);
        assert!(sample.id.is_empty());
        assert!(!sample.active);
        assert!(sample.label.is_empty());
    }

    /// Numeric ids are stringified
    #[test]
    fn test_numeric_id() {
        let sample: Sample = serde_json::from_value(json!({"id": 42, "total": 7.0})).unwrap();
        assert_eq!(sample.id, "42");
        assert_eq!(sample.total, 7);
    }

    /// Missing fields fall back to defaults
    #[test]
    fn test_missing_fields() {
        let sample: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(sample.amount, None);
        assert_eq!(sample.total, 0);
    }

    #[test]
    fn test_parse_decimal_scientific() {
        assert_eq!(parse_decimal("1e3"), Some(Decimal::from(1000)));
        assert_eq!(parse_decimal("  "), None);
        assert_eq!(parse_decimal("KES"), None);
    }
}
