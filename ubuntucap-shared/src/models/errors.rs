use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Key Django REST uses for errors not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Envelope keys that never name a form field.
const META_KEYS: &[&str] = &[
    "success",
    "detail",
    "message",
    "error",
    "errors",
    "status",
    "code",
    NON_FIELD_ERRORS,
];

/// Validation messages keyed by field name.
///
/// Fields are kept in sorted order so summaries are stable across renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Builder-style variant of [`FieldErrors::insert`].
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.insert(field, message);
        self
    }

    /// Returns the first message recorded for `field`, the one shown inline.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// Returns `true` when any message was recorded for `field`.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates fields with their messages in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Moves all messages from `other` into `self`.
    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    /// One-line rendering: `field: a, b; other: c`. Non-field errors are
    /// listed without a prefix.
    #[must_use]
    pub fn summary(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let parts = self
            .iter()
            .map(|(field, messages)| {
                if field == NON_FIELD_ERRORS {
                    messages.join(", ")
                } else {
                    format!("{field}: {}", messages.join(", "))
                }
            })
            .collect::<Vec<_>>();
        Some(parts.join("; "))
    }

    /// Reads a Django-style error object. Values may be a message, a list of
    /// messages, or a nested object whose messages are flattened.
    #[must_use]
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let mut errors = Self::new();
        for (field, value) in object {
            for message in collect_messages(value) {
                errors.insert(field.clone(), message);
            }
        }
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary().unwrap_or_default())
    }
}

fn collect_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => vec![text.clone()],
        Value::Array(items) => items.iter().flat_map(collect_messages).collect(),
        Value::Object(nested) => nested.values().flat_map(collect_messages).collect(),
        _ => Vec::new(),
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

/// A failure response reduced to one message plus per-field detail.
///
/// Every error shape the API produces (`{detail}`, `{message}`, `{errors: ...}`,
/// or a bare serializer field map) decodes into this one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Headline message when the backend supplied one.
    pub message: Option<String>,
    /// Messages attributable to individual form fields.
    pub field_errors: FieldErrors,
}

impl ErrorBody {
    /// Creates an error body carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            field_errors: FieldErrors::new(),
        }
    }

    /// Normalizes any JSON error payload.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let object = match value {
            Value::Object(object) => object,
            Value::String(text) if !text.trim().is_empty() => return Self::new(text.trim()),
            Value::Array(_) => {
                let messages = collect_messages(value);
                return Self {
                    message: messages.first().cloned(),
                    field_errors: FieldErrors::new(),
                };
            }
            _ => return Self::default(),
        };

        let mut message = non_empty_str(object, "detail")
            .or_else(|| non_empty_str(object, "message"))
            .or_else(|| non_empty_str(object, "error"))
            .map(str::to_string);
        let mut field_errors = FieldErrors::new();

        match object.get("errors") {
            Some(Value::String(text)) if message.is_none() && !text.trim().is_empty() => {
                message = Some(text.trim().to_string());
            }
            Some(Value::Object(fields)) => field_errors.merge(FieldErrors::from_object(fields)),
            Some(value @ Value::Array(_)) => {
                for text in collect_messages(value) {
                    field_errors.insert(NON_FIELD_ERRORS, text);
                }
            }
            _ => {}
        }

        if let Some(value) = object.get(NON_FIELD_ERRORS) {
            for text in collect_messages(value) {
                field_errors.insert(NON_FIELD_ERRORS, text);
            }
        }

        // Bare serializer output: `{"phone_number": ["..."]}`.
        if !object.contains_key("errors") {
            for (field, value) in object {
                if META_KEYS.contains(&field.as_str()) {
                    continue;
                }
                if let Value::Array(items) = value {
                    if !items.is_empty() && items.iter().all(Value::is_string) {
                        for text in collect_messages(value) {
                            field_errors.insert(field.clone(), text);
                        }
                    }
                }
            }
        }

        if message.is_none() {
            message = field_errors
                .first(NON_FIELD_ERRORS)
                .map(str::to_string)
                .or_else(|| field_errors.summary());
        }

        Self {
            message,
            field_errors,
        }
    }

    /// Normalizes a raw response body, which may not be JSON at all.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(value) => Self::from_value(&value),
            Err(_) => {
                let trimmed = text.trim();
                // HTML error pages are useless to the user.
                if trimmed.is_empty() || trimmed.starts_with('<') || trimmed.len() > 200 {
                    Self::default()
                } else {
                    Self::new(trimmed)
                }
            }
        }
    }

    /// The headline message, or `fallback` when the payload carried none.
    #[must_use]
    pub fn message_or(&self, fallback: &str) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => f.write_str(message),
            None => f.write_str(&self.field_errors.to_string()),
        }
    }
}

/// Returns `true` when a 2xx body still reports failure via `success: false`.
#[must_use]
pub fn reports_failure(value: &Value) -> bool {
    matches!(value.get("success"), Some(Value::Bool(false)))
}
