//! Issue tracker seam.
//!
//! The harness only needs five capabilities from a tracker: search, create,
//! comment, update a description and link two issues. [`IssueTracker`]
//! captures exactly that; [`jira::JiraClient`] implements it over HTTP and
//! tests substitute an in-memory fake.

pub mod jira;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use jira::JiraClient;

/// Link type used between a defect and the case issue it was raised from.
pub const RELATES_LINK: &str = "Relates";

/// Tracker operation errors.
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Request could not be sent or the connection failed
    #[error("Tracker request failed: {0}")]
    Http(String),

    /// Tracker answered with a non-success status
    #[error("Tracker returned {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not have the expected shape
    #[error("Unexpected tracker response: {0}")]
    Decode(String),

    /// Client settings are unusable
    #[error("Tracker not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for TrackerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TrackerError::Decode(err.to_string())
        } else {
            TrackerError::Http(err.to_string())
        }
    }
}

/// Issue type names understood by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueType {
    Bug,
    Task,
}

impl IssueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bug => "Bug",
            Self::Task => "Task",
        }
    }
}

/// An existing tracker issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
}

/// Fields for a new issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project_key: String,
    pub summary: String,
    pub description: String,
    pub issue_type: IssueType,
}

/// Tracker capabilities used by the defect reporter and fixture tooling.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Run a JQL query and return matching issues in tracker order.
    async fn search(&self, jql: &str) -> Result<Vec<Issue>, TrackerError>;

    /// Create an issue and return it with its assigned key.
    async fn create(&self, issue: NewIssue) -> Result<Issue, TrackerError>;

    /// Append a comment to an issue.
    async fn comment(&self, key: &str, body: &str) -> Result<(), TrackerError>;

    /// Replace an issue's description.
    async fn update_description(&self, key: &str, description: &str) -> Result<(), TrackerError>;

    /// Link `inward` to `outward` with the named link type.
    async fn link(&self, link_type: &str, inward: &str, outward: &str)
    -> Result<(), TrackerError>;
}

/// Quote a value for use inside a JQL string literal.
pub fn jql_quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
