use actix_web::{web, HttpResponse};

use crate::errors::AppError;
use crate::metrics::PrometheusOrderMetrics;

/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String)),
    tag = "ops"
)]
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("ok")
}

/// GET /metrics
///
/// Prometheus text exposition of the order pipeline counters.
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus metrics", body = String),
        (status = 500, description = "Internal server error"),
    ),
    tag = "ops"
)]
pub async fn metrics(
    metrics: web::Data<PrometheusOrderMetrics>,
) -> Result<HttpResponse, AppError> {
    let body = metrics
        .render()
        .map_err(|e| AppError::Internal(format!("metrics encoding failed: {}", e)))?;

    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(body))
}
