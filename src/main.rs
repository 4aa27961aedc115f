use actix_web::{web, App, HttpServer, middleware};
use anyhow::Result;
use solicitudes_aduana::api::middleware::compression::create_compression_middleware;
use solicitudes_aduana::api::{configure_routes, ApiState};
use solicitudes_aduana::core::AppConfig;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    tracing::info!("Starting check/transfer request API");

    prometheus::default_registry()
        .register(Box::new(prometheus::process_collector::ProcessCollector::for_self()))?;

    let config = AppConfig::from_env()?;
    if config.api_tokens.is_empty() {
        tracing::warn!("API_TOKENS is empty, every /api/v1 request will be rejected");
    }

    let host = config.host.clone();
    let port = config.port;
    let enable_compression = config.enable_compression;

    let state = web::Data::new(ApiState::new(config).await?);

    let sweeper = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            sweeper.evict_idle_sessions().await;
        }
    });

    tracing::info!("Starting server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(create_compression_middleware(enable_compression))
            .wrap(TracingLogger::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    Ok(())
}
