// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Partial structural comparison of JSON documents

use serde_json::Value;

/// Check that `actual` agrees with every field `expected` sets.
///
/// Fields that are null, missing, or empty (string, list or map) in
/// `expected` are ignored, so values defaulted or injected server-side do
/// not count as drift. Non-empty lists must match element-wise with equal
/// length.
pub fn is_derivative(expected: &Value, actual: &Value) -> bool {
    match expected {
        Value::Null => true,
        Value::String(s) if s.is_empty() => true,
        Value::Array(items) if items.is_empty() => true,
        Value::Object(fields) if fields.is_empty() => true,
        Value::Array(expected) => match actual {
            Value::Array(actual) => {
                expected.len() == actual.len()
                    && expected
                        .iter()
                        .zip(actual)
                        .all(|(e, a)| is_derivative(e, a))
            }
            _ => false,
        },
        Value::Object(expected) => match actual {
            Value::Object(actual) => expected
                .iter()
                .all(|(key, e)| is_derivative(e, actual.get(key).unwrap_or(&Value::Null))),
            _ => false,
        },
        scalar => scalar == actual,
    }
}
