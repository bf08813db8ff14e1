//! Defect reconciliation with the tracker.

use store_qa_lib::models::{CaseSelection, PENDING_DEFECT_KEY};
use store_qa_lib::tracker::{IssueType, RELATES_LINK};

use super::support::*;

fn failing_case() -> store_qa_lib::models::NewTestCase {
    rest_case("TC_007", "/api/v1/products/9999", "GET", 200, None)
}

/// First failure files a Bug, records its key and links it to the case issue.
#[actix_rt::test]
async fn test_first_failure_creates_linked_bug() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![failing_case()]).await;
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let _ = orchestrator.run(&CaseSelection::All).await;

    let row = pool.latest_test_result("TC_007").await.unwrap().unwrap();
    assert_eq!(row.defect_key.as_deref(), Some("QA-500"));

    tracker.snapshot(|s| {
        assert_eq!(s.issues.len(), 1);
        let bug = &s.issues[0];
        assert_eq!(bug.issue_type, IssueType::Bug);
        assert!(bug.summary.starts_with("Defect for TC_007"));
        assert!(bug.description.contains("**Endpoint**: /api/v1/products/9999"));
        assert!(bug.description.contains("404"));
        assert!(bug.description.ends_with("**Defect key**: QA-500"));
        assert_eq!(
            s.links,
            vec![(RELATES_LINK.to_string(), "QA-500".to_string(), "QA-7".to_string())]
        );
        assert!(s.comments.is_empty());
    });
}

/// Later failures comment on the existing Bug instead of filing another.
#[actix_rt::test]
async fn test_repeat_failure_comments_on_existing_bug() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![failing_case()]).await;
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let _ = orchestrator.run(&CaseSelection::All).await;
    let _ = orchestrator.run(&CaseSelection::All).await;

    let rows = pool.list_test_results("TC_007").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.defect_key.as_deref() == Some("QA-500")));

    tracker.snapshot(|s| {
        assert_eq!(s.issues.len(), 1);
        assert_eq!(s.comments.len(), 1);
        let (key, body) = &s.comments[0];
        assert_eq!(key, "QA-500");
        assert!(body.starts_with("Retest for test case TC_007"));
        assert!(body.contains("**Defect key**: QA-500"));
        assert_eq!(s.links.len(), 1);
    });
}

/// Defects from other cases never match a case's search.
#[actix_rt::test]
async fn test_defects_are_scoped_per_case() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![
        failing_case(),
        rest_case("TC_008", "/api/v1/products/9999", "DELETE", 204, None),
    ])
    .await;
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let _ = orchestrator.run(&CaseSelection::All).await;

    let first = pool.latest_test_result("TC_007").await.unwrap().unwrap();
    let second = pool.latest_test_result("TC_008").await.unwrap().unwrap();
    assert_eq!(first.defect_key.as_deref(), Some("QA-500"));
    assert_eq!(second.defect_key.as_deref(), Some("QA-501"));
    tracker.snapshot(|s| assert_eq!(s.issues.len(), 2));
}

/// Tracker outages leave the defect pending without aborting the run.
#[actix_rt::test]
async fn test_tracker_failure_records_pending() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![
        failing_case(),
        rest_case("TC_014", "/api/v1/health", "GET", 200, None),
    ])
    .await;
    let tracker = FakeTracker::new();
    tracker.set_failing(true);
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let _ = orchestrator.run(&CaseSelection::All).await;

    let failed = pool.latest_test_result("TC_007").await.unwrap().unwrap();
    assert_eq!(failed.result, "not passed");
    assert_eq!(failed.defect_key.as_deref(), Some(PENDING_DEFECT_KEY));

    let passed = pool.latest_test_result("TC_014").await.unwrap().unwrap();
    assert_eq!(passed.result, "passed");

    tracker.set_failing(false);
    let _ = orchestrator.run(&CaseSelection::PreviouslyFailed).await;
    let retried = pool.latest_test_result("TC_007").await.unwrap().unwrap();
    assert_eq!(retried.defect_key.as_deref(), Some("QA-500"));
    assert_eq!(retried.retry_count, 1);
}

/// A test id without a numeric suffix still gets a defect, just unlinked.
#[actix_rt::test]
async fn test_case_without_issue_number_is_not_linked() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![rest_case(
        "TC_SMOKE",
        "/api/v1/products/9999",
        "GET",
        200,
        None,
    )])
    .await;
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let _ = orchestrator.run(&CaseSelection::All).await;

    let row = pool.latest_test_result("TC_SMOKE").await.unwrap().unwrap();
    assert_eq!(row.defect_key.as_deref(), Some("QA-500"));
    tracker.snapshot(|s| {
        assert_eq!(s.issues.len(), 1);
        assert!(s.links.is_empty());
    });
}
