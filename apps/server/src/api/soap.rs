//! SOAP endpoint with fixed responses for the three product operations.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use tracing::{info, warn};

use crate::soap::{self, SoapError, SoapRequest};

/// Literal id returned by every CreateProduct call.
pub const CREATED_PRODUCT_ID: i64 = 21;

/// Status and `result` text for a decoded request.
pub fn reply(request: &SoapRequest) -> (StatusCode, String) {
    match request {
        SoapRequest::GetProduct { id } => (
            StatusCode::OK,
            format!(
                "{{'id': {}, 'name': 'Laptop', 'description': 'Laptop gamingowy'}}",
                id
            ),
        ),
        SoapRequest::CreateProduct { .. } => {
            (StatusCode::CREATED, CREATED_PRODUCT_ID.to_string())
        }
        SoapRequest::DeleteProduct { .. } => (
            StatusCode::NO_CONTENT,
            "{'status': 'Product deleted'}".to_string(),
        ),
    }
}

fn fault(message: &str) -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type(soap::CONTENT_TYPE)
        .body(soap::fault_envelope("soap:Client", message))
}

#[utoipa::path(
    post,
    path = "/soap/",
    tag = "SOAP",
    request_body(content = String, content_type = "text/xml"),
    responses(
        (status = 200, description = "GetProduct result envelope"),
        (status = 201, description = "CreateProduct result envelope"),
        (status = 204, description = "DeleteProduct"),
        (status = 400, description = "SOAP fault"),
    )
)]
pub async fn soap_service(body: web::Bytes) -> HttpResponse {
    let Ok(text) = std::str::from_utf8(&body) else {
        warn!("SOAP request body is not UTF-8");
        return fault("Invalid operation");
    };

    let request = match SoapRequest::from_envelope(text) {
        Ok(request) => request,
        Err(e @ (SoapError::MissingField(_) | SoapError::InvalidField { .. })) => {
            warn!("Rejected SOAP request: {}", e);
            return fault(&e.to_string());
        }
        Err(e) => {
            warn!("Rejected SOAP request: {}", e);
            return fault("Invalid operation");
        }
    };

    let operation = request.operation();
    let (status, result) = reply(&request);
    info!("SOAP {} -> {}", operation, status.as_u16());

    HttpResponse::build(status)
        .content_type(soap::CONTENT_TYPE)
        .body(soap::response_envelope(operation, &result))
}

/// Configure the SOAP route (mounted at the application root).
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/soap/").route(web::post().to(soap_service)));
}
