// ABOUTME: Parses repeated `key=value` flags into partial update and filter records
// ABOUTME: Keys are the records' camelCase wire names; unknown keys are rejected

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssignmentError {
    #[error("Expected key=value, got '{0}'")]
    Malformed(String),

    #[error("Field '{0}' given more than once")]
    Duplicate(String),

    #[error("Invalid {record}: {source}")]
    Invalid {
        record: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Read the value half of `key=value`.
///
/// Numbers, booleans and `null` keep their JSON type; anything else is a
/// string. Quote a value (`name="42"`) to force a string.
fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() {
        return Value::String(String::new());
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Null | Value::String(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Split `key=value` pairs in the order given, rejecting repeated keys
fn split_pairs(pairs: &[String]) -> Result<Vec<(String, Value)>, AssignmentError> {
    let mut split: Vec<(String, Value)> = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| AssignmentError::Malformed(pair.clone()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(AssignmentError::Malformed(pair.clone()));
        }
        if split.iter().any(|(seen, _)| seen == key) {
            return Err(AssignmentError::Duplicate(key.to_string()));
        }
        split.push((key.to_string(), parse_value(value)));
    }
    Ok(split)
}

/// Turn `["name=Portal", "budget=1000"]` into a JSON object
pub fn parse_assignments(pairs: &[String]) -> Result<Map<String, Value>, AssignmentError> {
    Ok(split_pairs(pairs)?.into_iter().collect())
}

/// Turn `key=value` pairs into the raw text a form field holds.
///
/// Pairs keep the order given. Quotes are stripped and `null` becomes blank;
/// the form runs its own rules.
pub fn parse_form_assignments(pairs: &[String]) -> Result<Vec<(String, String)>, AssignmentError> {
    Ok(split_pairs(pairs)?
        .into_iter()
        .map(|(key, value)| {
            let raw = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, raw)
        })
        .collect())
}

/// Build a record such as `ProjectFilter` from `key=value` pairs.
///
/// Enum values may be typed loosely (`status=in_progress`, `status="in progress"`):
/// a value the record rejects is retried in wire spelling, one field at a time.
pub fn parse_record<T: DeserializeOwned>(
    record: &'static str,
    pairs: &[String],
) -> Result<T, AssignmentError> {
    let object = parse_assignments(pairs)?;
    serde_json::from_value(Value::Object(object.clone())).or_else(|first| {
        let accepts = |key: &str, value: &Value| {
            let single = Map::from_iter([(key.to_string(), value.clone())]);
            serde_json::from_value::<T>(Value::Object(single)).is_ok()
        };

        let respelled: Map<String, Value> = object
            .into_iter()
            .map(|(key, value)| {
                let wire = match &value {
                    Value::String(s) if looks_like_enum(s) => Some(Value::String(wire_spelling(s))),
                    _ => None,
                };
                match wire {
                    Some(wire) if !accepts(&key, &value) && accepts(&key, &wire) => (key, wire),
                    _ => (key, value),
                }
            })
            .collect();

        serde_json::from_value(Value::Object(respelled)).map_err(|_| AssignmentError::Invalid {
            record,
            source: first,
        })
    })
}

fn looks_like_enum(value: &str) -> bool {
    !value.trim().is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphabetic() || matches!(c, '_' | '-' | ' '))
}

fn wire_spelling(value: &str) -> String {
    value.trim().to_uppercase().replace(['-', ' '], "_")
}
