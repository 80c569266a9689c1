use slot_booking_ddd::{
    adapters::postgres::{
        PostgresBookingRepository, PostgresCustomerService, PostgresSlotService,
        PostgresStaffService,
    },
    api::{handlers::AppState, router::create_router},
    application::booking::ServiceDependencies,
    config::AppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slot_booking_ddd=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Initialize database connection pool
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Initialize adapters
    let service_deps = ServiceDependencies {
        booking_repository: Arc::new(PostgresBookingRepository::new(pool.clone())),
        slot_service: Arc::new(PostgresSlotService::new(pool.clone())),
        customer_service: Arc::new(PostgresCustomerService::new(pool.clone())),
        staff_service: Arc::new(PostgresStaffService::new(pool)),
    };

    let app_state = Arc::new(AppState { service_deps });

    // Create router
    let app = create_router(app_state, config.request_timeout);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    // Start server
    axum::serve(listener, app).await?;

    Ok(())
}
