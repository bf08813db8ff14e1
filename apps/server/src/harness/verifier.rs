//! Response verification.
//!
//! Status is checked first and a mismatch ends verification. The body is
//! compared only when the case has a non-empty expected response:
//! an expected JSON object must be a subset of the decoded actual body,
//! any other expected JSON value must equal it exactly, and when either
//! side is not JSON the raw texts must match.

use serde_json::{Map, Value};

use super::dispatcher::RawResponse;
use crate::models::test_result::truncate_chars;
use crate::models::{Protocol, RESPONSE_SNIPPET_LIMIT, TestCase};
use crate::soap;

/// Why a response was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum VerifyError {
    #[error("Expected status {expected}, got {actual}")]
    StatusMismatch { expected: i32, actual: u16 },

    #[error("Missing key '{0}' in response")]
    MissingKey(String),

    #[error("Expected {key}: {expected}, got {key}: {actual}")]
    ValueMismatch {
        key: String,
        expected: Value,
        actual: Value,
    },

    #[error("Expected response {expected}, got {actual}")]
    BodyMismatch { expected: String, actual: String },

    #[error("No result element in SOAP response")]
    MissingResult,

    #[error("Malformed SOAP response: {0}")]
    MalformedSoap(String),
}

impl VerifyError {
    /// Structural failures mean the response could not be interpreted at all,
    /// as opposed to a value that differs from expectations.
    pub fn is_structural(&self) -> bool {
        matches!(self, Self::MissingResult | Self::MalformedSoap(_))
    }
}

/// Verify a case's response. On success returns the text to store as
/// `actual_response`.
pub fn verify(case: &TestCase, actual: &RawResponse) -> Result<String, VerifyError> {
    match case.protocol() {
        Protocol::Rest => verify_rest(case.expected_status, case.expected_body(), actual),
        Protocol::Soap => verify_soap(case.expected_status, case.expected_body(), actual),
    }
}

/// Verify a REST response body.
pub fn verify_rest(
    expected_status: i32,
    expected: Option<&str>,
    actual: &RawResponse,
) -> Result<String, VerifyError> {
    check_status(expected_status, actual.status)?;

    let decoded = serde_json::from_str::<Value>(&actual.body).ok();
    if let Some(expected) = expected {
        compare_body(expected, decoded.as_ref(), &actual.body)?;
    }

    Ok(snippet(decoded.as_ref(), &actual.body))
}

/// Verify a SOAP response by its `result` element.
///
/// A 204 carries no envelope, so once the status matches there is nothing
/// left to compare.
pub fn verify_soap(
    expected_status: i32,
    expected: Option<&str>,
    actual: &RawResponse,
) -> Result<String, VerifyError> {
    check_status(expected_status, actual.status)?;

    if actual.status == 204 {
        return Ok(snippet(None, &actual.body));
    }

    let decoded = match decode_soap_result(&actual.body) {
        Ok(value) => value,
        Err(e) if expected.is_some() => return Err(e),
        Err(_) => return Ok(snippet(None, &actual.body)),
    };

    if let Some(expected) = expected {
        let raw = decoded.to_string();
        compare_body(expected, Some(&decoded), &raw)?;
    }

    Ok(snippet(Some(&decoded), &actual.body))
}

/// Extract and decode the `result` element of a SOAP response.
///
/// Single quotes are normalized to double quotes before JSON decoding; a
/// decoded value that is not an object is wrapped as `{"result": value}`.
pub fn decode_soap_result(body: &str) -> Result<Value, VerifyError> {
    let text = soap::result_text(body)
        .map_err(|e| VerifyError::MalformedSoap(e.to_string()))?
        .ok_or(VerifyError::MissingResult)?;

    let normalized = text.replace('\'', "\"");
    let value: Value = serde_json::from_str(&normalized).map_err(|e| {
        VerifyError::MalformedSoap(format!("result is not JSON ({}): {}", e, text))
    })?;

    Ok(match value {
        Value::Object(_) => value,
        other => {
            let mut wrapped = Map::new();
            wrapped.insert("result".to_string(), other);
            Value::Object(wrapped)
        }
    })
}

fn check_status(expected: i32, actual: u16) -> Result<(), VerifyError> {
    if expected == i32::from(actual) {
        Ok(())
    } else {
        Err(VerifyError::StatusMismatch { expected, actual })
    }
}

fn compare_body(expected: &str, decoded: Option<&Value>, raw: &str) -> Result<(), VerifyError> {
    match (serde_json::from_str::<Value>(expected), decoded) {
        (Ok(Value::Object(fields)), Some(actual)) => subset_match(&fields, actual),
        (Ok(expected_value), Some(actual)) => {
            if json_eq(&expected_value, actual) {
                Ok(())
            } else {
                Err(VerifyError::BodyMismatch {
                    expected: expected_value.to_string(),
                    actual: actual.to_string(),
                })
            }
        }
        _ => {
            if raw == expected {
                Ok(())
            } else {
                Err(VerifyError::BodyMismatch {
                    expected: expected.to_string(),
                    actual: raw.to_string(),
                })
            }
        }
    }
}

/// Every expected key must be present in `actual` with an equal value.
fn subset_match(expected: &Map<String, Value>, actual: &Value) -> Result<(), VerifyError> {
    for (key, expected_value) in expected {
        let Some(actual_value) = actual.get(key) else {
            return Err(VerifyError::MissingKey(key.clone()));
        };
        if !json_eq(expected_value, actual_value) {
            return Err(VerifyError::ValueMismatch {
                key: key.clone(),
                expected: expected_value.clone(),
                actual: actual_value.clone(),
            });
        }
    }
    Ok(())
}

/// Structural equality where numbers compare by value (`1 == 1.0`).
fn json_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => x.as_f64() == y.as_f64(),
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| json_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| json_eq(x, y)))
        }
        _ => a == b,
    }
}

/// Compact JSON of the decoded body, or the raw body, cut to the stored limit.
fn snippet(decoded: Option<&Value>, raw: &str) -> String {
    let text = match decoded {
        Some(value) => value.to_string(),
        None => raw.to_string(),
    };
    truncate_chars(&text, RESPONSE_SNIPPET_LIMIT)
}
