use actix_web::{web, App, HttpServer};
use anyhow::{Context, Result};
use db_pool::{create_pool, DbConfig};
use murmur_service::{handlers, views::Views, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting murmur-service");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!(
        env = %config.app.env,
        port = config.app.port,
        "Configuration loaded"
    );

    let db_config = DbConfig::from_env("murmur-service")
        .map_err(|e| anyhow::anyhow!("Failed to load database configuration: {e}"))?;
    db_config.log_config();
    let pool = create_pool(db_config)
        .await
        .context("Failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    info!("Database migrations completed");

    let views = Views::new().map_err(|e| anyhow::anyhow!("Failed to load templates: {e}"))?;
    let views = web::Data::new(views);
    let pool_data = web::Data::new(pool);
    let config_data = web::Data::new(config.clone());

    let bind_addr = format!("{}:{}", config.app.host, config.app.port);
    info!(addr = %bind_addr, "HTTP server listening");

    HttpServer::new(move || {
        App::new()
            .app_data(pool_data.clone())
            .app_data(config_data.clone())
            .app_data(views.clone())
            .wrap(tracing_actix_web::TracingLogger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_addr)
    .context("Failed to bind HTTP server")?
    .run()
    .await
    .context("HTTP server error")?;

    info!("murmur-service shutting down");
    Ok(())
}
