//! SOAP cases through the full pipeline.

use store_qa_lib::harness::RunError;
use store_qa_lib::models::{CaseSelection, NewTestCase};

use super::support::*;

fn soap_case(test_id: &str, operation: &str, expected_status: i32, expected: Option<&str>) -> NewTestCase {
    NewTestCase {
        test_id: test_id.to_string(),
        description: format!("{} over SOAP", operation),
        endpoint: operation.to_string(),
        method: "POST".to_string(),
        test_type: "soap".to_string(),
        expected_status,
        expected_response: expected.map(str::to_string),
    }
}

/// The three seeded SOAP cases pass against the store.
#[actix_rt::test]
async fn test_soap_cases_pass() {
    let store = StoreServer::start().await;
    let pool = case_pool().await;
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let selection = CaseSelection::from_args(Some("SOAP_TC_001,SOAP_TC_002,SOAP_TC_003"), false);
    let summary = orchestrator.run(&selection).await.unwrap();

    assert_eq!(summary.cases.len(), 3);
    let get = pool.latest_test_result("SOAP_TC_001").await.unwrap().unwrap();
    assert_eq!(get.actual_status, 200);
    assert!(get.actual_response.contains("Laptop"));

    let create = pool.latest_test_result("SOAP_TC_002").await.unwrap().unwrap();
    assert_eq!(create.actual_status, 201);

    let delete = pool.latest_test_result("SOAP_TC_003").await.unwrap().unwrap();
    assert_eq!(delete.actual_status, 204);
    tracker.snapshot(|s| assert!(s.issues.is_empty()));
}

/// A SOAP mismatch files an unlinked defect describing the operation.
#[actix_rt::test]
async fn test_soap_failure_files_unlinked_defect() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![soap_case(
        "SOAP_TC_001",
        "GetProduct",
        200,
        Some(r#"{"name": "Monitor"}"#),
    )])
    .await;
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let result = orchestrator.run(&CaseSelection::All).await;
    assert!(matches!(result, Err(RunError::Failed(_))));

    let row = pool.latest_test_result("SOAP_TC_001").await.unwrap().unwrap();
    assert_eq!(row.result, "not passed");
    assert_eq!(row.defect_key.as_deref(), Some("QA-500"));

    tracker.snapshot(|s| {
        let bug = &s.issues[0];
        assert!(bug.description.contains("**Operation**: GetProduct"));
        assert!(bug.description.contains("id=1"));
        assert!(s.links.is_empty());
    });
}

/// An unknown operation name never reaches the wire.
#[actix_rt::test]
async fn test_unknown_soap_operation_is_error() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![soap_case("SOAP_TC_009", "RenameProduct", 200, None)]).await;
    let orchestrator = orchestrator(&pool, &store.settings(), FakeTracker::new());

    let _ = orchestrator.run(&CaseSelection::All).await;

    let row = pool.latest_test_result("SOAP_TC_009").await.unwrap().unwrap();
    assert_eq!(row.actual_status, 0);
    assert!(row.actual_response.starts_with("Error: "));
}

/// A SOAP number too large to offset is still recorded, with an unlinked defect.
#[actix_rt::test]
async fn test_oversized_soap_number_is_recorded_unlinked() {
    let store = StoreServer::start().await;
    let pool = pool_with_cases(vec![soap_case(
        "SOAP_TC_4294967290",
        "GetProduct",
        201,
        None,
    )])
    .await;
    let tracker = FakeTracker::new();
    let orchestrator = orchestrator(&pool, &store.settings(), tracker.clone());

    let result = orchestrator.run(&CaseSelection::All).await;
    assert!(matches!(result, Err(RunError::Failed(_))));

    let rows = pool.list_test_results("SOAP_TC_4294967290").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].defect_key.as_deref(), Some("QA-500"));
    tracker.snapshot(|s| {
        assert_eq!(s.issues.len(), 1);
        assert!(s.links.is_empty());
    });
}
