use manga_cafe::{
    adapters::{in_memory::InMemoryStore, postgres},
    api::{handlers::AppState, router::create_router},
    application::{ServiceDependencies, rental::detect_overdue_rentals},
    config::{AppConfig, StorageBackend},
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "manga_cafe=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Initialize adapters
    let service_deps = match config.storage {
        StorageBackend::Postgres => {
            tracing::info!("Database URL: {}", config.database_url);

            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect(&config.database_url)
                .await?;

            sqlx::migrate!("./migrations").run(&pool).await?;

            postgres::service_dependencies(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(InMemoryStore::new()).into_dependencies()
        }
    };

    match config.overdue_sweep_interval {
        Some(interval) => spawn_overdue_sweep(service_deps.clone(), interval),
        None => tracing::info!("Overdue sweep disabled"),
    }

    // Create application state
    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state);

    // Server configuration
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}

/// 延滞検出バッチを一定間隔で実行する
fn spawn_overdue_sweep(deps: ServiceDependencies, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            match detect_overdue_rentals(&deps, chrono::Utc::now()).await {
                Ok(0) => {}
                Ok(count) => tracing::info!(count, "overdue rentals recorded"),
                Err(e) => tracing::error!("Overdue sweep failed: {}", e),
            }
        }
    });
}
