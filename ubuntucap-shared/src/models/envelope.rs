//! Unwrapping of the response envelopes the API wraps payloads in.
//!
//! Depending on the endpoint and backend version a payload arrives bare, under
//! a named key next to `success`, or (for lists) as a top-level array. These
//! helpers pick the payload out so callers decode one typed shape.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Returns the value under the first of `keys` that is present and non-null,
/// or the whole body when none is.
#[must_use]
pub fn pick<'a>(body: &'a Value, keys: &[&str]) -> &'a Value {
    keys.iter()
        .filter_map(|key| body.get(*key))
        .find(|value| !value.is_null())
        .unwrap_or(body)
}

/// Decodes the payload found by [`pick`].
///
/// # Errors
/// Fails when the picked value does not match `T`.
pub fn decode<T: DeserializeOwned>(body: &Value, keys: &[&str]) -> Result<T, serde_json::Error> {
    T::deserialize(pick(body, keys))
}

/// Decodes a list found under one of `keys`, or a bare top-level array.
///
/// A body that carries none of the keys yields an empty list, which is how
/// the API reports "nothing yet" on several endpoints.
///
/// # Errors
/// Fails when an element does not match `T`.
pub fn decode_list<T: DeserializeOwned>(
    body: &Value,
    keys: &[&str],
) -> Result<Vec<T>, serde_json::Error> {
    match pick(body, keys) {
        list @ Value::Array(_) => Vec::<T>::deserialize(list),
        _ => Ok(Vec::new()),
    }
}
