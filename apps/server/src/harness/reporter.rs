//! Defect reporting against the issue tracker.
//!
//! One open Bug per test id: an existing `Defect for <test_id>` issue gets a
//! retest comment, otherwise a new Bug is filed. Tracker failures are logged
//! and reported as `None`; they never abort a run.

use std::sync::Arc;

use tracing::{error, info};

use super::dispatcher::soap_operation;
use super::payloads;
use crate::models::{Protocol, TestCase};
use crate::tracker::{IssueTracker, IssueType, NewIssue, RELATES_LINK, TrackerError, jql_quote};

/// Summary prefix shared by every defect filed for a case.
pub fn defect_summary_prefix(test_id: &str) -> String {
    format!("Defect for {}", test_id)
}

/// JQL locating existing defects for a case.
pub fn defect_query(project_key: &str, test_id: &str) -> String {
    format!(
        "project={} AND issuetype=Bug AND summary ~ {}",
        project_key,
        jql_quote(&defect_summary_prefix(test_id))
    )
}

pub struct DefectReporter {
    tracker: Arc<dyn IssueTracker>,
    project_key: String,
}

impl DefectReporter {
    pub fn new(tracker: Arc<dyn IssueTracker>, project_key: impl Into<String>) -> Self {
        Self {
            tracker,
            project_key: project_key.into(),
        }
    }

    /// File or update the defect for a failed case.
    ///
    /// Returns the defect key, or `None` when the tracker could not be used.
    pub async fn report(
        &self,
        case: &TestCase,
        issue_key: Option<&str>,
        actual_status: u16,
        failure_text: &str,
    ) -> Option<String> {
        match self
            .try_report(case, issue_key, actual_status, failure_text)
            .await
        {
            Ok(key) => Some(key),
            Err(e) => {
                error!("Failed to report defect for {}: {}", case.test_id, e);
                None
            }
        }
    }

    async fn try_report(
        &self,
        case: &TestCase,
        issue_key: Option<&str>,
        actual_status: u16,
        failure_text: &str,
    ) -> Result<String, TrackerError> {
        let jql = defect_query(&self.project_key, &case.test_id);
        let existing = self.tracker.search(&jql).await?;
        info!("Found {} existing defect(s) for {}", existing.len(), case.test_id);

        if let Some(defect) = existing.first() {
            let comment = retest_comment(case, actual_status, failure_text, &defect.key);
            self.tracker.comment(&defect.key, &comment).await?;
            info!("Commented on existing defect {} for {}", defect.key, case.test_id);
            return Ok(defect.key.clone());
        }

        let description = defect_description(case, issue_key, actual_status, failure_text);
        let created = self
            .tracker
            .create(NewIssue {
                project_key: self.project_key.clone(),
                summary: format!("{}: {}", defect_summary_prefix(&case.test_id), case.description),
                description: description.clone(),
                issue_type: IssueType::Bug,
            })
            .await?;
        info!("Created defect {} for {}", created.key, case.test_id);

        let with_key = format!("{}**Defect key**: {}", description, created.key);
        self.tracker
            .update_description(&created.key, &with_key)
            .await?;

        match (case.protocol(), issue_key) {
            (Protocol::Rest, Some(origin)) => {
                self.tracker
                    .link(RELATES_LINK, &created.key, origin)
                    .await?;
                info!("Linked defect {} to {}", created.key, origin);
            }
            _ => info!("Defect {} left unlinked", created.key),
        }

        Ok(created.key)
    }
}

fn retest_comment(case: &TestCase, actual_status: u16, failure_text: &str, defect_key: &str) -> String {
    format!(
        "Retest for test case {}:\n\
         **Actual status**: {}\n\
         **Actual response**: {}\n\
         **Test Result**: not passed\n\
         **Defect created**: yes\n\
         **Defect key**: {}",
        case.test_id, actual_status, failure_text, defect_key
    )
}

fn defect_description(
    case: &TestCase,
    issue_key: Option<&str>,
    actual_status: u16,
    failure_text: &str,
) -> String {
    let target = match case.protocol() {
        Protocol::Rest => format!("**Endpoint**: {}\n", case.endpoint),
        Protocol::Soap => match soap_operation(case) {
            Ok(operation) => {
                let input = payloads::soap_request(&case.test_id, operation)
                    .fields()
                    .into_iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("**Operation**: {}\n**Input**: {}\n", operation, input)
            }
            Err(_) => format!("**Operation**: {}\n", case.endpoint),
        },
    };

    format!(
        "**Test case**: {}\n\
         {}\
         **Method**: {}\n\
         **Expected status**: {}\n\
         **Actual status**: {}\n\
         **Expected response**: {}\n\
         **Actual response**: {}\n\
         **Related test case**: {}\n\
         **Test Result**: not passed\n\
         **Defect created**: yes\n",
        case.test_id,
        target,
        case.method,
        case.expected_status,
        actual_status,
        case.expected_response.as_deref().unwrap_or_default(),
        failure_text,
        issue_key.unwrap_or("-"),
    )
}
