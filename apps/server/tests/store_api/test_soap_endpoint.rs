//! SOAP route wire behaviour.

use actix_web::test;

use store_qa_lib::soap::{self, SoapRequest};

use super::test_helpers::*;

fn soap_post(body: String) -> actix_http::Request {
    test::TestRequest::post()
        .uri("/soap/")
        .insert_header(("Content-Type", soap::CONTENT_TYPE))
        .set_payload(body)
        .to_request()
}

#[actix_rt::test]
async fn test_get_product_envelope() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call_text(&app, soap_post(SoapRequest::GetProduct { id: 1 }.to_envelope())).await;

    assert_eq!(status, 200);
    let result = soap::result_text(&body).unwrap().unwrap();
    assert!(result.contains("'name': 'Laptop'"));
}

#[actix_rt::test]
async fn test_create_product_envelope() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let request = SoapRequest::CreateProduct {
        name: "Test <Product>".to_string(),
        description: "Test Description".to_string(),
        price: 99.99,
    };
    let (status, body) = call_text(&app, soap_post(request.to_envelope())).await;

    assert_eq!(status, 201);
    assert_eq!(soap::result_text(&body).unwrap().as_deref(), Some("21"));
}

#[actix_rt::test]
async fn test_unknown_operation_is_fault() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let envelope = format!(
        r#"<soap:Envelope xmlns:soap="{}"><soap:Body><RenameProduct/></soap:Body></soap:Envelope>"#,
        soap::ENVELOPE_NS
    );
    let (status, body) = call_text(&app, soap_post(envelope)).await;

    assert_eq!(status, 400);
    assert!(body.contains("Invalid operation"));
}

#[actix_rt::test]
async fn test_garbage_body_is_fault() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let (status, body) = call_text(&app, soap_post("not xml".to_string())).await;

    assert_eq!(status, 400);
    assert!(body.contains("Fault"));
}

#[actix_rt::test]
async fn test_deeply_nested_envelope_is_fault() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let depth = 20_000;
    let envelope = format!(
        r#"<soap:Envelope xmlns:soap="{}"><soap:Body>{}{}</soap:Body></soap:Envelope>"#,
        soap::ENVELOPE_NS,
        "<a>".repeat(depth),
        "</a>".repeat(depth)
    );
    let (status, body) = call_text(&app, soap_post(envelope)).await;

    assert_eq!(status, 400);
    assert!(body.contains("Invalid operation"));

    let (status, _) = call_text(&app, soap_post(SoapRequest::GetProduct { id: 1 }.to_envelope())).await;
    assert_eq!(status, 200);
}
