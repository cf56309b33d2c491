//! Per-request HTTP metrics.

use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::Instant;

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::Error;
use futures::future::LocalBoxFuture;

use crate::metrics::PrometheusOrderMetrics;

/// Label used for requests that matched no route.
const UNMATCHED: &str = "unmatched";

/// Counts every request and records its latency under the matched route
/// pattern (`/orders/{id}`), never the raw path.
#[derive(Clone)]
pub struct RequestMetrics {
    metrics: Arc<PrometheusOrderMetrics>,
}

impl RequestMetrics {
    pub fn new(metrics: Arc<PrometheusOrderMetrics>) -> Self {
        Self { metrics }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = RequestMetricsMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestMetricsMiddleware {
            service,
            metrics: self.metrics.clone(),
        }))
    }
}

pub struct RequestMetricsMiddleware<S> {
    service: S,
    metrics: Arc<PrometheusOrderMetrics>,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let started = Instant::now();
        let method = req.method().to_string();
        let metrics = self.metrics.clone();
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let path = res
                .request()
                .match_pattern()
                .unwrap_or_else(|| UNMATCHED.to_string());
            metrics.observe_request(
                &path,
                &method,
                res.status().as_u16(),
                started.elapsed().as_secs_f64(),
            );
            Ok(res)
        })
    }
}
