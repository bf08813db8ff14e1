//! Test case listing.

use actix_web::{HttpResponse, web};

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::TestCaseResponse;

#[utoipa::path(
    get,
    path = "/api/v1/test-cases",
    tag = "Test Cases",
    responses(
        (status = 200, description = "All test cases in store order", body = Vec<TestCaseResponse>),
    )
)]
pub async fn list_test_cases(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let cases: Vec<TestCaseResponse> = pool
        .list_test_cases()
        .await?
        .into_iter()
        .map(TestCaseResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(cases))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/test-cases").route(web::get().to(list_test_cases)));
}
