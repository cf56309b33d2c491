pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod metrics;
pub mod middleware;
pub mod schema;

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::catalog_service::CatalogService;
use application::order_service::OrderService;
use config::AppConfig;
use handlers::ApiDoc;
use infrastructure::catalog_repo::DieselCatalogRepository;
use infrastructure::order_repo::DieselOrderStore;
use metrics::PrometheusOrderMetrics;
use middleware::RequestMetrics;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Build and return an actix-web `Server` bound to `config.host:config.port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(pool: DbPool, config: &AppConfig) -> std::io::Result<actix_web::dev::Server> {
    let metrics = Arc::new(PrometheusOrderMetrics::new().map_err(std::io::Error::other)?);

    let orders = web::Data::new(OrderService::new(
        DieselOrderStore::new(pool.clone(), config.statement_timeout_ms),
        metrics.clone(),
        config.retry_policy(),
    ));
    let catalog = web::Data::new(CatalogService::new(DieselCatalogRepository::new(pool)));
    let request_metrics = RequestMetrics::new(metrics.clone());
    let metrics = web::Data::from(metrics);

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(orders.clone())
            .app_data(catalog.clone())
            .app_data(metrics.clone())
            .wrap(request_metrics.clone())
            .wrap(Logger::default())
            .configure(handlers::configure::<DieselOrderStore, DieselCatalogRepository>)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", ApiDoc::openapi()),
            )
    })
    .bind((config.host.clone(), config.port))?
    .run())
}
