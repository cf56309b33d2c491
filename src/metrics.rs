//! Order pipeline counters.
//!
//! Components receive an `Arc<dyn OrderMetrics>` instead of touching global
//! state. [`PrometheusOrderMetrics`] keeps its counters in a registry it owns,
//! so several instances (one per test, say) never collide.
//!
//! ## Metrics Exported
//!
//! - `orders_created_total` - orders committed
//! - `order_create_failures_total` - rejected order attempts, labeled by reason
//! - `stock_reservation_conflicts_total` - conditional decrements retried after a conflict
//! - `http_requests_total` - served requests, labeled by service, route, method and status
//! - `http_request_duration_seconds` - request latency, labeled by service, route and method

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::domain::errors::DomainError;

/// Value of the `service` label on the HTTP metrics.
pub const SERVICE_LABEL: &str = env!("CARGO_PKG_NAME");

pub trait OrderMetrics: Send + Sync {
    fn order_created(&self);
    fn order_rejected(&self, error: &DomainError);
    fn reservation_conflict(&self);
}

pub struct PrometheusOrderMetrics {
    registry: Registry,
    orders_created: IntCounter,
    order_failures: IntCounterVec,
    reservation_conflicts: IntCounter,
    http_requests: IntCounterVec,
    http_latency: HistogramVec,
}

impl PrometheusOrderMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let orders_created =
            IntCounter::new("orders_created_total", "Orders created successfully")?;
        let order_failures = IntCounterVec::new(
            Opts::new("order_create_failures_total", "Order create failures"),
            &["reason"],
        )?;
        let reservation_conflicts = IntCounter::new(
            "stock_reservation_conflicts_total",
            "Conditional stock decrements retried after a store conflict",
        )?;

        let http_requests = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests"),
            &["service", "path", "method", "status"],
        )?;
        let http_latency = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "Request latency"),
            &["service", "path", "method"],
        )?;

        registry.register(Box::new(orders_created.clone()))?;
        registry.register(Box::new(order_failures.clone()))?;
        registry.register(Box::new(reservation_conflicts.clone()))?;
        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_latency.clone()))?;

        Ok(Self {
            registry,
            orders_created,
            order_failures,
            reservation_conflicts,
            http_requests,
            http_latency,
        })
    }

    pub fn created_count(&self) -> u64 {
        self.orders_created.get()
    }

    pub fn failure_count(&self, reason: &str) -> u64 {
        self.order_failures.with_label_values(&[reason]).get()
    }

    pub fn conflict_count(&self) -> u64 {
        self.reservation_conflicts.get()
    }

    /// Record one served request. `path` should be the matched route pattern
    /// so ids do not end up as label values.
    pub fn observe_request(&self, path: &str, method: &str, status: u16, seconds: f64) {
        let status = status.to_string();
        self.http_requests
            .with_label_values(&[SERVICE_LABEL, path, method, &status])
            .inc();
        self.http_latency
            .with_label_values(&[SERVICE_LABEL, path, method])
            .observe(seconds);
    }

    pub fn request_count(&self, path: &str, method: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.http_requests
            .with_label_values(&[SERVICE_LABEL, path, method, &status])
            .get()
    }

    /// Render every metric in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

impl OrderMetrics for PrometheusOrderMetrics {
    fn order_created(&self) {
        self.orders_created.inc();
    }

    fn order_rejected(&self, error: &DomainError) {
        self.order_failures.with_label_values(&[error.kind()]).inc();
    }

    fn reservation_conflict(&self) {
        self.reservation_conflicts.inc();
    }
}
