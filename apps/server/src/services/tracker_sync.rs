//! Tracker housekeeping: mirror test cases as tasks, check connectivity.

use tracing::info;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::TestCase;
use crate::tracker::{IssueTracker, IssueType, JiraClient, NewIssue, TrackerError, jql_quote};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Store(#[from] AppError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

/// Keys created and test ids skipped by a sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: Vec<String>,
    pub skipped: Vec<String>,
}

/// Result of a connectivity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerStatus {
    pub project_key: String,
    pub project_name: String,
    pub issue_count: u64,
}

fn task_description(case: &TestCase) -> String {
    format!(
        "**Endpoint**: {}\n\
         **Method**: {}\n\
         **Test Type**: {}\n\
         **Expected Status**: {}\n\
         **Expected Response**: {}",
        case.endpoint,
        case.method,
        case.test_type,
        case.expected_status,
        case.expected_response.as_deref().unwrap_or_default()
    )
}

/// Create a Task for every case that has no issue mentioning its test_id.
pub async fn sync_cases(
    pool: &DbPool,
    tracker: &dyn IssueTracker,
    project_key: &str,
) -> Result<SyncReport, SyncError> {
    let cases: Vec<TestCase> = pool
        .list_test_cases()
        .await?
        .into_iter()
        .map(TestCase::from)
        .collect();
    info!("Found {} test case(s) to sync", cases.len());

    let mut report = SyncReport::default();
    for case in cases {
        let jql = format!("project={} AND summary ~ {}", project_key, jql_quote(&case.test_id));
        if !tracker.search(&jql).await?.is_empty() {
            info!("Test case {} already tracked, skipping", case.test_id);
            report.skipped.push(case.test_id);
            continue;
        }

        let issue = tracker
            .create(NewIssue {
                project_key: project_key.to_string(),
                summary: format!("{}: {}", case.test_id, case.description),
                description: task_description(&case),
                issue_type: IssueType::Task,
            })
            .await?;
        info!("Created {} for test case {}", issue.key, case.test_id);
        report.created.push(issue.key);
    }

    Ok(report)
}

/// Verify credentials, project visibility and search.
pub async fn check_connection(
    client: &JiraClient,
    project_key: &str,
) -> Result<TrackerStatus, TrackerError> {
    let project = client.project(project_key).await?;
    info!("Project {} exists: {}", project.key, project.name);

    let issue_count = client.count(&format!("project={}", project_key)).await?;
    info!("Project {} has {} issue(s)", project_key, issue_count);

    Ok(TrackerStatus {
        project_key: project.key,
        project_name: project.name,
        issue_count,
    })
}
