//! Product CRUD handlers.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::{CreateProductRequest, ProductPatch, ProductResponse};

fn not_found() -> AppError {
    AppError::NotFound("Product".to_string())
}

#[utoipa::path(
    get,
    path = "/api/v1/products",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Vec<ProductResponse>),
    )
)]
pub async fn list_products(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let products: Vec<ProductResponse> = pool
        .list_products()
        .await?
        .into_iter()
        .map(ProductResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(products))
}

#[utoipa::path(
    get,
    path = "/api/v1/products/{product_id}",
    tag = "Products",
    params(
        ("product_id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 200, description = "The product", body = ProductResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn get_product(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let product = pool.get_product(path.into_inner()).await?.ok_or_else(not_found)?;
    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

#[utoipa::path(
    post,
    path = "/api/v1/products",
    tag = "Products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn create_product(
    pool: web::Data<DbPool>,
    body: web::Json<CreateProductRequest>,
) -> AppResult<HttpResponse> {
    let new_product = body.into_inner().validate()?;
    let product = pool.insert_product(new_product).await?;
    info!("Created product {} ({})", product.id, product.name);

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// Partial update: only fields present in the body change.
#[utoipa::path(
    put,
    path = "/api/v1/products/{product_id}",
    tag = "Products",
    params(
        ("product_id" = i32, Path, description = "Product id")
    ),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Updated product", body = ProductResponse),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
        (status = 422, description = "Validation failed", body = crate::error::ErrorResponse),
    )
)]
pub async fn update_product(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    body: web::Json<ProductPatch>,
) -> AppResult<HttpResponse> {
    let patch = body.into_inner();
    patch.validate()?;

    let product = pool
        .update_product(path.into_inner(), patch)
        .await?
        .ok_or_else(not_found)?;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/products/{product_id}",
    tag = "Products",
    params(
        ("product_id" = i32, Path, description = "Product id")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 404, description = "Product not found", body = crate::error::ErrorResponse),
    )
)]
pub async fn delete_product(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_product(id).await? {
        return Err(not_found());
    }
    info!("Deleted product {}", id);

    Ok(HttpResponse::NoContent().finish())
}

/// Configure product routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/products")
            .route(web::get().to(list_products))
            .route(web::post().to(create_product)),
    )
    .service(
        web::resource("/products/{product_id}")
            .route(web::get().to(get_product))
            .route(web::put().to(update_product))
            .route(web::delete().to(delete_product)),
    );
}
