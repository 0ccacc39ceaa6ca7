use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Result;

use squadhub::Config;
use squadhub::database::init_database;
use squadhub::handlers::system;
use squadhub::middleware::{RequestIdMiddleware, RequestInfoMiddleware, rate_limit};
use squadhub::routes;

// How often expired auth rate-limit trackers are purged
const RATE_LIMIT_CLEANUP_SECONDS: u64 = 300;

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting SquadHub API server...");

    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);
    if config.is_production() && config.jwt_secret.starts_with("your-super-secret") {
        log::warn!("JWT_SECRET is not set; using the development default in production");
    }

    init_database(&config.database_url).await?;
    log::info!("Database initialized");

    tokio::fs::create_dir_all(&config.storage_dir).await?;

    tokio::spawn(rate_limit::cleanup_rate_limits(RATE_LIMIT_CLEANUP_SECONDS));

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    let config_data = web::Data::new(config.clone());

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .expose_headers(vec!["X-Correlation-ID"])
                    .max_age(3600),
            )
            .wrap(RequestInfoMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(system::index)
            .service(system::health)
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
