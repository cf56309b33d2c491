pub mod health;
pub mod identity;
pub mod orders;
pub mod products;

use actix_web::web;
use utoipa::OpenApi;

use crate::domain::ports::{CatalogRepository, OrderStore};
use crate::errors::AppError;

#[derive(OpenApi)]
#[openapi(
    paths(
        orders::create_order,
        orders::list_my_orders,
        orders::get_order,
        products::list_products,
        products::get_product,
        products::create_product,
        products::update_product,
        products::delete_product,
        health::health,
        health::metrics,
    ),
    components(schemas(
        orders::CreateOrderRequest,
        orders::OrderItemRequest,
        orders::OrderResponse,
        orders::OrderItemResponse,
        products::ProductRequest,
        products::ProductResponse,
    )),
    tags(
        (name = "orders", description = "Order placement and history"),
        (name = "products", description = "Product catalog"),
        (name = "ops", description = "Health and metrics"),
    )
)]
pub struct ApiDoc;

/// Register every route. The order and catalog stores are type parameters so
/// the same routing serves both Postgres and the in-memory store.
pub fn configure<S: OrderStore, C: CatalogRepository>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .route("/health", web::get().to(health::health))
    .route("/metrics", web::get().to(health::metrics))
    .service(
        web::scope("/orders")
            .route("", web::post().to(orders::create_order::<S>))
            .route("/me", web::get().to(orders::list_my_orders::<S>))
            .route("/{id}", web::get().to(orders::get_order::<S>)),
    )
    .service(
        web::scope("/products")
            .route("", web::get().to(products::list_products::<C>))
            .route("", web::post().to(products::create_product::<C>))
            .route("/{id}", web::get().to(products::get_product::<C>))
            .route("/{id}", web::put().to(products::update_product::<C>))
            .route("/{id}", web::delete().to(products::delete_product::<C>)),
    );
}
