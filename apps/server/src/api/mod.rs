//! API endpoint modules.

pub mod customers;
pub mod health;
pub mod openapi;
pub mod orders;
pub mod products;
pub mod soap;
pub mod test_cases;

use actix_web::web;

use crate::error::{AppError, FieldError};

pub use customers::configure_routes as configure_customer_routes;
pub use health::configure_health_routes;
pub use openapi::ApiDoc;
pub use orders::configure_routes as configure_order_routes;
pub use products::configure_routes as configure_product_routes;
pub use soap::configure_routes as configure_soap_routes;
pub use test_cases::configure_routes as configure_test_case_routes;

/// JSON extractor settings: undecodable bodies become 422 validation errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::Validation(vec![FieldError::new("body", err.to_string())]).into()
    })
}

/// Mount every store route: the greeting at `/`, REST under `/api/v1` and
/// the SOAP endpoint at `/soap/`.
pub fn configure_store(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .service(health::welcome)
        .service(
            web::scope("/api/v1")
                .configure(configure_health_routes)
                .configure(configure_product_routes)
                .configure(configure_customer_routes)
                .configure(configure_order_routes)
                .configure(configure_test_case_routes),
        )
        .configure(configure_soap_routes);
}
