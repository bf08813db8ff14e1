//! Customer listing.

use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::CustomerResponse;

#[utoipa::path(
    get,
    path = "/api/v1/customers",
    tag = "Customers",
    responses(
        (status = 200, description = "All customers", body = Vec<CustomerResponse>),
    )
)]
pub async fn list_customers(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let customers: Vec<CustomerResponse> = pool
        .list_customers()
        .await?
        .into_iter()
        .map(CustomerResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(customers))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/customers").route(web::get().to(list_customers)));
}
