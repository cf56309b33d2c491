use dotenvy::dotenv;
use orders_service::config::AppConfig;
use orders_service::{build_server, create_pool, run_migrations};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;

    let pool = create_pool(&config.database_url, config.db_pool_max_size)
        .map_err(std::io::Error::other)?;
    run_migrations(&pool).map_err(std::io::Error::other)?;

    log::info!(
        "Starting server at http://{}:{} (reserve attempts: {}, statement timeout: {}ms)",
        config.host,
        config.port,
        config.reserve_max_attempts,
        config.statement_timeout_ms
    );

    build_server(pool, &config)?.await
}
