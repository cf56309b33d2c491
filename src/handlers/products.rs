use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::catalog_service::CatalogService;
use crate::domain::identity::CallerIdentity;
use crate::domain::ports::CatalogRepository;
use crate::domain::product::{Product, ProductInput};
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub stock: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub stock: i32,
}

impl From<ProductRequest> for ProductInput {
    fn from(req: ProductRequest) -> Self {
        ProductInput {
            name: req.name,
            price_cents: req.price_cents,
            stock: req.stock,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        ProductResponse {
            id: p.id,
            name: p.name,
            price_cents: p.price_cents,
            stock: p.stock,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /products
#[utoipa::path(
    get,
    path = "/products",
    responses(
        (status = 200, description = "All products ordered by id", body = [ProductResponse]),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn list_products<C: CatalogRepository>(
    service: web::Data<CatalogService<C>>,
) -> Result<HttpResponse, AppError> {
    let products = web::block(move || service.list_products())
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<ProductResponse> = products.into_iter().map(ProductResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /products/{id}
#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, description = "Malformed product id"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn get_product<C: CatalogRepository>(
    service: web::Data<CatalogService<C>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let product = web::block(move || service.get_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// POST /products
///
/// Catalog writes require a caller identity like order placement does.
#[utoipa::path(
    post,
    path = "/products",
    params(
        ("X-User" = String, Header, description = "Caller identity set by the gateway"),
    ),
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Missing caller identity"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn create_product<C: CatalogRepository>(
    service: web::Data<CatalogService<C>>,
    _caller: CallerIdentity,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let input = ProductInput::from(body.into_inner());
    let product = web::block(move || service.create_product(input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(ProductResponse::from(product)))
}

/// PUT /products/{id}
///
/// Replaces name, price and stock. Existing orders keep the price they were
/// placed with.
#[utoipa::path(
    put,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id"),
        ("X-User" = String, Header, description = "Caller identity set by the gateway"),
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 400, description = "Invalid product"),
        (status = 401, description = "Missing caller identity"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn update_product<C: CatalogRepository>(
    service: web::Data<CatalogService<C>>,
    _caller: CallerIdentity,
    path: web::Path<i64>,
    body: web::Json<ProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let input = ProductInput::from(body.into_inner());
    let product = web::block(move || service.update_product(id, input))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(ProductResponse::from(product)))
}

/// DELETE /products/{id}
#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(
        ("id" = i64, Path, description = "Product id"),
        ("X-User" = String, Header, description = "Caller identity set by the gateway"),
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 401, description = "Missing caller identity"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "products"
)]
pub async fn delete_product<C: CatalogRepository>(
    service: web::Data<CatalogService<C>>,
    _caller: CallerIdentity,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    web::block(move || service.delete_product(id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::NoContent().finish())
}
