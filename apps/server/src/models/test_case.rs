//! Test case fixtures and run selection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entity::test_case;

/// Which API surface a case exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Rest,
    Soap,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rest => "rest",
            Self::Soap => "soap",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable case definition as read by the harness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestCase {
    pub test_id: String,
    pub description: String,
    /// REST path (appended to the base URL) or SOAP operation name
    pub endpoint: String,
    /// HTTP verb or SOAP operation tag
    pub method: String,
    pub test_type: String,
    pub expected_status: i32,
    /// JSON document or literal body; `None`/empty skips body comparison
    pub expected_response: Option<String>,
}

impl TestCase {
    /// SOAP when typed `soap` or carrying the `SOAP_` id prefix.
    pub fn protocol(&self) -> Protocol {
        if self.test_type.eq_ignore_ascii_case("soap") || self.test_id.starts_with("SOAP_") {
            Protocol::Soap
        } else {
            Protocol::Rest
        }
    }

    /// Numeric suffix of the test id (`TC_007` -> 7, `SOAP_TC_002` -> 2).
    pub fn number(&self) -> Option<u32> {
        self.test_id.rsplit('_').next()?.parse().ok()
    }

    /// The expected response when it is present and non-blank.
    pub fn expected_body(&self) -> Option<&str> {
        self.expected_response
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

impl From<test_case::Model> for TestCase {
    fn from(model: test_case::Model) -> Self {
        Self {
            test_id: model.test_id,
            description: model.description,
            endpoint: model.endpoint,
            method: model.method,
            test_type: model.test_type,
            expected_status: model.expected_status,
            expected_response: model.expected_response,
        }
    }
}

/// Which cases a run executes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaseSelection {
    /// Every case in the store
    All,
    /// Exactly these test ids (unknown ids are ignored)
    Ids(Vec<String>),
    /// Cases with at least one "not passed" result on record
    PreviouslyFailed,
}

impl CaseSelection {
    /// Build a selection from command-line style inputs.
    ///
    /// An explicit id list wins over the previously-failed flag.
    pub fn from_args(test_ids: Option<&str>, run_failed: bool) -> Self {
        let ids: Vec<String> = test_ids
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        if !ids.is_empty() {
            Self::Ids(ids)
        } else if run_failed {
            Self::PreviouslyFailed
        } else {
            Self::All
        }
    }
}

/// Case definition accepted by `qa-admin import-cases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTestCase {
    pub test_id: String,
    pub description: String,
    pub endpoint: String,
    pub method: String,
    pub test_type: String,
    pub expected_status: i32,
    #[serde(default, deserialize_with = "expected_response_text")]
    pub expected_response: Option<String>,
}

/// Fixture files may give the expected response as a JSON value or as text.
fn expected_response_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    })
}

/// Test case as returned by `GET /test-cases`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TestCaseResponse {
    pub id: i32,
    pub test_id: String,
    pub description: String,
    pub endpoint: String,
    pub method: String,
    pub test_type: String,
    pub expected_status: i32,
    pub expected_response: Option<String>,
}

impl From<test_case::Model> for TestCaseResponse {
    fn from(model: test_case::Model) -> Self {
        Self {
            id: model.id,
            test_id: model.test_id,
            description: model.description,
            endpoint: model.endpoint,
            method: model.method,
            test_type: model.test_type,
            expected_status: model.expected_status,
            expected_response: model.expected_response,
        }
    }
}
