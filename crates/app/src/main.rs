use std::time::Duration;

use engine::{PaymentClient, PaymentConfig};
use migration::{Migrator, MigratorTrait};
use settings::Database;

mod settings;

const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "openrent={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.server.database).await?;

    let engine = engine::Engine::builder().database(db.clone()).build().await?;

    let payments = PaymentClient::new(PaymentConfig {
        base_url: settings.payment.base_url,
        store_id: settings.payment.store_id,
        store_secret: settings.payment.store_secret,
        return_url: settings.payment.return_url,
        timeout: Duration::from_secs(
            settings
                .payment
                .timeout_secs
                .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_SECS),
        ),
    })?;

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("openrent starting on {addr}");

    server::run_with_listener(engine, payments, db, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
