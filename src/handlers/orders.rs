use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::order_service::OrderService;
use crate::domain::identity::CallerIdentity;
use crate::domain::order::{OrderView, RequestedItem};
use crate::domain::ports::OrderStore;
use crate::errors::AppError;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_id: i64,
    pub qty: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// Duplicate product ids are merged by summing their quantities.
    #[serde(default)]
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub product_id: i64,
    pub qty: i32,
    /// Unit price captured when the order was placed.
    pub price_cents: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: String,
    pub total_cents: i64,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderItemRequest> for RequestedItem {
    fn from(item: OrderItemRequest) -> Self {
        RequestedItem {
            product_id: item.product_id,
            qty: item.qty,
        }
    }
}

impl From<OrderView> for OrderResponse {
    fn from(order: OrderView) -> Self {
        OrderResponse {
            id: order.id,
            user_id: order.user_id,
            created_at: order.created_at.to_rfc3339(),
            total_cents: order.total_cents,
            items: order
                .items
                .into_iter()
                .map(|i| OrderItemResponse {
                    product_id: i.product_id,
                    qty: i.qty,
                    price_cents: i.price_cents,
                })
                .collect(),
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /orders
///
/// Reserves stock for every requested item and records the order with its
/// price snapshots in one database transaction. Either the whole order is
/// created or nothing changes.
#[utoipa::path(
    post,
    path = "/orders",
    params(
        ("X-User" = String, Header, description = "Caller identity set by the gateway"),
    ),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Invalid items or unknown product"),
        (status = 401, description = "Missing caller identity"),
        (status = 409, description = "Insufficient stock"),
        (status = 503, description = "Stock contention, retry later"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order<S: OrderStore>(
    service: web::Data<OrderService<S>>,
    caller: CallerIdentity,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
    let items: Vec<RequestedItem> = body
        .into_inner()
        .items
        .into_iter()
        .map(RequestedItem::from)
        .collect();

    let order = web::block(move || service.place_order(&caller, &items))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Created().json(OrderResponse::from(order)))
}

/// GET /orders/me
///
/// Returns the caller's orders, newest first, each with its items.
#[utoipa::path(
    get,
    path = "/orders/me",
    params(
        ("X-User" = String, Header, description = "Caller identity set by the gateway"),
    ),
    responses(
        (status = 200, description = "Caller's orders", body = [OrderResponse]),
        (status = 401, description = "Missing caller identity"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn list_my_orders<S: OrderStore>(
    service: web::Data<OrderService<S>>,
    caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
    let orders = web::block(move || service.list_orders(&caller))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    let body: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /orders/{id}
///
/// Returns one of the caller's orders. Orders of other callers are reported
/// as not found.
#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order UUID"),
        ("X-User" = String, Header, description = "Caller identity set by the gateway"),
    ),
    responses(
        (status = 200, description = "Order found", body = OrderResponse),
        (status = 400, description = "Malformed order id"),
        (status = 401, description = "Missing caller identity"),
        (status = 404, description = "Order not found"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn get_order<S: OrderStore>(
    service: web::Data<OrderService<S>>,
    caller: CallerIdentity,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();

    let order = web::block(move || service.get_order(&caller, order_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(HttpResponse::Ok().json(OrderResponse::from(order)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    use super::*;
    use crate::application::catalog_service::CatalogService;
    use crate::application::reservation::RetryPolicy;
    use crate::domain::ports::CatalogRepository;
    use crate::domain::product::ProductInput;
    use crate::handlers::configure;
    use crate::handlers::identity::USER_HEADER;
    use crate::infrastructure::memory::InMemoryStore;
    use crate::metrics::PrometheusOrderMetrics;

    fn seeded_store() -> (InMemoryStore, i64, i64) {
        let store = InMemoryStore::new();
        let add = |price_cents, stock| {
            store
                .create(&ProductInput {
                    name: "item".to_string(),
                    price_cents,
                    stock,
                })
                .expect("create")
                .id
        };
        let p1 = add(500, 10);
        let p2 = add(300, 1);
        (store, p1, p2)
    }

    macro_rules! app {
        ($store:expr) => {{
            let metrics = Arc::new(PrometheusOrderMetrics::new().expect("metrics"));
            test::init_service(
                App::new()
                    .app_data(web::Data::new(OrderService::new(
                        $store.clone(),
                        metrics.clone(),
                        RetryPolicy::default(),
                    )))
                    .app_data(web::Data::new(CatalogService::new($store.clone())))
                    .app_data(web::Data::from(metrics))
                    .configure(configure::<InMemoryStore, InMemoryStore>),
            )
            .await
        }};
    }

    #[actix_web::test]
    async fn create_without_identity_is_unauthorized() {
        let (store, p1, _) = seeded_store();
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/orders")
            .set_json(json!({ "items": [{ "product_id": p1, "qty": 1 }] }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(store.find_by_id(p1).expect("find").expect("exists").stock, 10);
    }

    #[actix_web::test]
    async fn create_returns_the_priced_order() {
        let (store, p1, _) = seeded_store();
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_HEADER, "alice"))
            .set_json(json!({ "items": [
                { "product_id": p1, "qty": 1 },
                { "product_id": p1, "qty": 2 }
            ] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let body: OrderResponse = test::read_body_json(resp).await;
        assert_eq!(body.user_id, "alice");
        assert_eq!(body.total_cents, 1500);
        assert_eq!(body.items.len(), 1);
        assert_eq!(body.items[0].qty, 3);
        assert_eq!(body.items[0].price_cents, 500);
    }

    #[actix_web::test]
    async fn insufficient_stock_is_a_conflict_naming_the_product() {
        let (store, p1, p2) = seeded_store();
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_HEADER, "alice"))
            .set_json(json!({ "items": [
                { "product_id": p1, "qty": 2 },
                { "product_id": p2, "qty": 2 }
            ] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "insufficient_stock");
        assert_eq!(body["product_id"], p2);
        assert_eq!(store.find_by_id(p1).expect("find").expect("exists").stock, 10);
    }

    #[actix_web::test]
    async fn unknown_product_is_a_bad_request() {
        let (store, _, _) = seeded_store();
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_HEADER, "alice"))
            .set_json(json!({ "items": [{ "product_id": 999, "qty": 1 }] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "unknown_product");
        assert_eq!(body["product_id"], 999);
    }

    #[actix_web::test]
    async fn malformed_body_is_a_validation_error() {
        let (store, _, _) = seeded_store();
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_HEADER, "alice"))
            .insert_header(("content-type", "application/json"))
            .set_payload(r#"{"items": [{"product_id": "one", "qty": 1}]}"#)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation_error");
    }

    #[actix_web::test]
    async fn malformed_order_id_is_a_validation_error() {
        let (store, _, _) = seeded_store();
        let app = app!(store);

        let req = test::TestRequest::get()
            .uri("/orders/not-a-uuid")
            .insert_header((USER_HEADER, "alice"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "validation_error");
        assert!(body["message"].is_string());
    }

    #[actix_web::test]
    async fn empty_items_are_rejected() {
        let (store, _, _) = seeded_store();
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_HEADER, "alice"))
            .set_json(json!({ "items": [] }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn my_orders_are_listed_newest_first() {
        let (store, p1, _) = seeded_store();
        let app = app!(store);

        let mut created = Vec::new();
        for qty in [1, 2] {
            let req = test::TestRequest::post()
                .uri("/orders")
                .insert_header((USER_HEADER, "alice"))
                .set_json(json!({ "items": [{ "product_id": p1, "qty": qty }] }))
                .to_request();
            let body: OrderResponse = test::call_and_read_body_json(&app, req).await;
            created.push(body.id);
        }

        let req = test::TestRequest::get()
            .uri("/orders/me")
            .insert_header((USER_HEADER, "alice"))
            .to_request();
        let listed: Vec<OrderResponse> = test::call_and_read_body_json(&app, req).await;
        let ids: Vec<Uuid> = listed.iter().map(|o| o.id).collect();
        created.reverse();
        assert_eq!(ids, created);

        let req = test::TestRequest::get()
            .uri("/orders/me")
            .insert_header((USER_HEADER, "bob"))
            .to_request();
        let listed: Vec<OrderResponse> = test::call_and_read_body_json(&app, req).await;
        assert!(listed.is_empty());
    }

    #[actix_web::test]
    async fn order_of_another_caller_is_not_found() {
        let (store, p1, _) = seeded_store();
        let app = app!(store);

        let req = test::TestRequest::post()
            .uri("/orders")
            .insert_header((USER_HEADER, "alice"))
            .set_json(json!({ "items": [{ "product_id": p1, "qty": 1 }] }))
            .to_request();
        let order: OrderResponse = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::get()
            .uri(&format!("/orders/{}", order.id))
            .insert_header((USER_HEADER, "alice"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/orders/{}", order.id))
            .insert_header((USER_HEADER, "bob"))
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::NOT_FOUND
        );
    }
}
