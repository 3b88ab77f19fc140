//! Traversal helpers for upstream JSON documents.
//!
//! Upstream wraps every collection as `{"items": {id: record, ...}}` and
//! single references as `{"item": id}`. These helpers turn each missing step
//! into [`ApiError::Parse`] with the failing path in its detail.

use serde_json::{Map, Value};

use crate::error::{ApiError, ApiResult};

/// Look up `key` in an object.
pub fn field<'a>(value: &'a Value, key: &str) -> ApiResult<&'a Value> {
    value
        .get(key)
        .ok_or_else(|| ApiError::parse(format!("missing field `{}`", key)))
}

/// Walk a dotted path of object keys.
pub fn path<'a>(value: &'a Value, keys: &[&str]) -> ApiResult<&'a Value> {
    keys.iter().try_fold(value, |current, key| {
        current
            .get(*key)
            .ok_or_else(|| ApiError::parse(format!("missing field `{}`", keys.join("."))))
    })
}

/// Borrow a value as an object.
pub fn object<'a>(value: &'a Value, what: &str) -> ApiResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| ApiError::parse(format!("`{}` is not an object", what)))
}

/// First value of a mapping, in the order the server sent it.
///
/// Which entry is "first" among several is up to upstream; callers take it
/// as-is. An empty mapping is a parse failure.
pub fn first_value<'a>(value: &'a Value, what: &str) -> ApiResult<&'a Value> {
    object(value, what)?
        .values()
        .next()
        .ok_or_else(|| ApiError::parse(format!("`{}` is empty", what)))
}

/// Read a string field, accepting numeric ids as their decimal form.
pub fn string(value: &Value, what: &str) -> ApiResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ApiError::parse(format!("`{}` is not a string", what))),
    }
}

/// `string(path(value, keys))`
pub fn string_at(value: &Value, keys: &[&str]) -> ApiResult<String> {
    string(path(value, keys)?, &keys.join("."))
}
