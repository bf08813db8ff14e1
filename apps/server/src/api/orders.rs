//! Order listing.

use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::OrderResponse;

#[utoipa::path(
    get,
    path = "/api/v1/orders",
    tag = "Orders",
    responses(
        (status = 200, description = "All orders", body = Vec<OrderResponse>),
    )
)]
pub async fn list_orders(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let orders: Vec<OrderResponse> = pool
        .list_orders()
        .await?
        .into_iter()
        .map(OrderResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(orders))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/orders").route(web::get().to(list_orders)));
}
