//! Result rows: outcome, status precedence and retry numbering.

use sea_orm::ConnectionTrait;

use store_qa_lib::harness::RunError;
use store_qa_lib::models::CaseSelection;

use super::support::*;

/// A subset of the expected body is enough; extra keys are ignored.
#[actix_rt::test]
async fn test_expected_body_is_subset_match() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![rest_case(
        "TC_001",
        "/api/v1/products/1",
        "GET",
        200,
        Some(r#"{"name": "Laptop", "price": 4500.99}"#),
    )])
    .await;
    let orchestrator = orchestrator(&pool, &store.settings(), FakeTracker::new());

    orchestrator.run(&CaseSelection::All).await.unwrap();

    let row = pool.latest_test_result("TC_001").await.unwrap().unwrap();
    assert_eq!(row.result, "passed");
    assert_eq!(row.actual_status, 200);
    assert!(row.actual_response.contains("Laptop"));
}

/// A status mismatch fails the case even when the body would match.
#[actix_rt::test]
async fn test_status_mismatch_takes_precedence() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![rest_case(
        "TC_001",
        "/api/v1/health",
        "GET",
        201,
        Some(r#"{"status": "healthy"}"#),
    )])
    .await;
    let orchestrator = orchestrator(&pool, &store.settings(), FakeTracker::new());

    let result = orchestrator.run(&CaseSelection::All).await;
    assert!(matches!(result, Err(RunError::Failed(_))));

    let row = pool.latest_test_result("TC_001").await.unwrap().unwrap();
    assert_eq!(row.result, "not passed");
    assert_eq!(row.actual_status, 200);
    assert_eq!(row.actual_response, r#"Expected: {"status": "healthy"}, Got: 200"#);
}

/// A value that differs from the expected subset fails the case.
#[actix_rt::test]
async fn test_body_value_mismatch_fails() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![rest_case(
        "TC_001",
        "/api/v1/health",
        "GET",
        200,
        Some(r#"{"status": "down"}"#),
    )])
    .await;
    let orchestrator = orchestrator(&pool, &store.settings(), FakeTracker::new());

    let summary = match orchestrator.run(&CaseSelection::All).await {
        Err(RunError::Failed(summary)) => summary,
        other => panic!("Expected a failed run, got {:?}", other.map(|s| s.to_string())),
    };

    assert!(summary.failures[0].contains("status"));
    let row = pool.latest_test_result("TC_001").await.unwrap().unwrap();
    assert_eq!(row.result, "not passed");
    assert!(row.actual_response.starts_with("Expected: "));
}

/// retry_count counts the rows that existed before each attempt.
#[actix_rt::test]
async fn test_retry_count_increases_per_attempt() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![rest_case(
        "TC_001",
        "/api/v1/products/9999",
        "GET",
        200,
        None,
    )])
    .await;
    let orchestrator = orchestrator(&pool, &store.settings(), FakeTracker::new());

    for _ in 0..3 {
        let _ = orchestrator.run(&CaseSelection::All).await;
    }

    let rows = pool.list_test_results("TC_001").await.unwrap();
    let retries: Vec<i32> = rows.iter().map(|r| r.retry_count).collect();
    assert_eq!(retries, vec![0, 1, 2]);
    assert!(rows.iter().all(|r| r.actual_status == 404));
}

/// A case whose request cannot be sent is recorded with status 0.
#[actix_rt::test]
async fn test_unreachable_target_records_error() {
    let pool = pool_with_cases(vec![rest_case("TC_001", "/api/v1/health", "GET", 200, None)]).await;
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &unreachable_settings(), tracker.clone());

    let summary = match orchestrator.run(&CaseSelection::All).await {
        Err(RunError::Failed(summary)) => summary,
        other => panic!("Expected a failed run, got {:?}", other.map(|s| s.to_string())),
    };

    assert!(summary.failures[0].starts_with("Test TC_001 not passed due to error:"));
    let row = pool.latest_test_result("TC_001").await.unwrap().unwrap();
    assert_eq!(row.result, "not passed");
    assert_eq!(row.actual_status, 0);
    assert!(row.actual_response.starts_with("Error: "));
    assert_eq!(row.defect_key.as_deref(), Some("QA-500"));
    tracker.snapshot(|s| {
        assert!(s.issues[0].description.contains("**Actual status**: 0"));
        assert!(s.issues[0].description.contains("**Actual response**: Error: "));
    });
}

/// An unsupported HTTP verb is an error, not a mismatch.
#[actix_rt::test]
async fn test_unsupported_method_is_error() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![rest_case("TC_001", "/api/v1/health", "PATCH", 200, None)]).await;
    let orchestrator = orchestrator(&pool, &store.settings(), FakeTracker::new());

    let _ = orchestrator.run(&CaseSelection::All).await;

    let row = pool.latest_test_result("TC_001").await.unwrap().unwrap();
    assert_eq!(row.actual_status, 0);
    assert!(row.actual_response.starts_with("Error: "));
}

/// A result that cannot be stored aborts the run before the next case.
#[actix_rt::test]
async fn test_persistence_failure_aborts_run() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![
        rest_case("TC_001", "/api/v1/products/9999", "GET", 200, None),
        rest_case("TC_002", "/api/v1/products/9998", "GET", 200, None),
    ])
    .await;
    pool.connection()
        .execute_unprepared(
            "CREATE TRIGGER reject_results BEFORE INSERT ON test_results \
             BEGIN SELECT RAISE(ABORT, 'result store is read-only'); END",
        )
        .await
        .unwrap();
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let result = orchestrator.run(&CaseSelection::All).await;

    assert!(matches!(result, Err(RunError::Store(_))));
    assert_eq!(pool.count_test_results("TC_001").await.unwrap(), 0);
    assert_eq!(pool.count_test_results("TC_002").await.unwrap(), 0);
    tracker.snapshot(|s| {
        assert_eq!(s.issues.len(), 1, "only the first case was dispatched");
        assert!(s.issues[0].summary.starts_with("Defect for TC_001"));
        assert!(s.searches.iter().all(|q| !q.contains("TC_002")));
    });
}
