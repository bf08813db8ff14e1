//! OpenAPI documentation configuration.

use utoipa::OpenApi;

use crate::{api, error, models};

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Online Store API",
        version = "0.1.0",
        description = "Demo store service: product CRUD, customer/order listings, test case fixtures and a SOAP product endpoint"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::welcome,
        api::health::health,
        api::health::ready,
        // Products
        api::products::list_products,
        api::products::get_product,
        api::products::create_product,
        api::products::update_product,
        api::products::delete_product,
        // Listings
        api::customers::list_customers,
        api::orders::list_orders,
        api::test_cases::list_test_cases,
        // SOAP
        api::soap::soap_service,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            error::FieldError,
            // Health
            api::health::WelcomeResponse,
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Store
            models::ProductResponse,
            models::CreateProductRequest,
            models::ProductPatch,
            models::CustomerResponse,
            models::OrderResponse,
            models::TestCaseResponse,
        )
    ),
    tags(
        (name = "Health", description = "Greeting and health check endpoints"),
        (name = "Products", description = "Product catalogue CRUD"),
        (name = "Customers", description = "Customer listing"),
        (name = "Orders", description = "Order listing"),
        (name = "Test Cases", description = "Harness fixtures"),
        (name = "SOAP", description = "SOAP product operations")
    )
)]
pub struct ApiDoc;
