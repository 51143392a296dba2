//! Club attendance server binary

use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use club_attendance::{
    api,
    clock::SystemClock,
    config::{AppConfig, DatabaseBackend, DatabaseConfig},
    repository::{Database, MemoryDatabase, Repository},
    services::Services,
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("club_attendance={},tower_http=debug", config.logging.level).into()
    });
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.is_json() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(writer))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(writer))
            .init();
    }

    tracing::info!("Starting club attendance server v{}", env!("CARGO_PKG_VERSION"));

    let database = connect(&config.database).await?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    let state = AppState {
        services: Arc::new(Services::new(database, Arc::new(SystemClock))),
        config: Arc::new(config),
    };

    let app = api::router(state);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open the configured database backend, running migrations for Postgres
async fn connect(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn Database>> {
    match config.backend {
        DatabaseBackend::Memory => {
            tracing::warn!("Using in-memory database; data is lost on restart");
            Ok(Arc::new(MemoryDatabase::new()))
        }
        DatabaseBackend::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .min_connections(config.min_connections)
                .connect(&config.url)
                .await?;
            tracing::info!("Connected to database");

            let repository = Repository::new(pool);
            repository.migrate().await?;
            tracing::info!("Database migrations completed");

            Ok(Arc::new(repository))
        }
    }
}
