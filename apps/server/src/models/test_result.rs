//! Test result model: the persisted outcome of one case execution.

use serde::{Deserialize, Serialize};

/// Defect key recorded when the tracker could not be reached.
pub const PENDING_DEFECT_KEY: &str = "PENDING";

/// Maximum stored length of `actual_response`, in characters.
pub const RESPONSE_SNIPPET_LIMIT: usize = 500;

/// Outcome of a single case execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "passed")]
    Passed,
    #[serde(rename = "not passed")]
    NotPassed,
}

impl Outcome {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::NotPassed => "not passed",
        }
    }

    /// Parse from string representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "passed" => Some(Self::Passed),
            "not passed" => Some(Self::NotPassed),
            _ => None,
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Row to append to `test_results`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTestResult {
    pub test_id: String,
    pub outcome: Outcome,
    pub actual_status: i32,
    pub actual_response: String,
    pub defect_key: Option<String>,
    pub duration_ms: i64,
    pub environment: String,
    pub tester: String,
    pub retry_count: i32,
}

/// Cut `text` to at most `limit` characters, on a char boundary.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
