//! Read-only endpoints.

use actix_web::test;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_welcome_message() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call_json(&app, test::TestRequest::get().uri("/").to_request()).await;

    assert_eq!(status, 200);
    assert_eq!(body["message"], "Welcome to the Online Store API");
}

#[actix_rt::test]
async fn test_health_and_ready() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) =
        call_json(&app, test::TestRequest::get().uri("/api/v1/health").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, body) =
        call_json(&app, test::TestRequest::get().uri("/api/v1/ready").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "ready");
}

#[actix_rt::test]
async fn test_seeded_collections() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, products) =
        call_json(&app, test::TestRequest::get().uri("/api/v1/products").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(products.as_array().map(Vec::len), Some(20));
    assert_eq!(products[0]["name"], "Laptop");

    let (status, customers) =
        call_json(&app, test::TestRequest::get().uri("/api/v1/customers").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(customers.as_array().map(Vec::len), Some(5));

    let (status, orders) =
        call_json(&app, test::TestRequest::get().uri("/api/v1/orders").to_request()).await;
    assert_eq!(status, 200);
    assert_eq!(orders.as_array().map(Vec::len), Some(10));
}

#[actix_rt::test]
async fn test_test_cases_listing_includes_soap_cases() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, cases) =
        call_json(&app, test::TestRequest::get().uri("/api/v1/test-cases").to_request()).await;

    assert_eq!(status, 200);
    let ids: Vec<&str> = cases
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|c| c["test_id"].as_str())
        .collect();
    assert_eq!(ids, vec!["SOAP_TC_001", "SOAP_TC_002", "SOAP_TC_003"]);
}
