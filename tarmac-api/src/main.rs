use std::net::SocketAddr;

use tarmac_api::{
    app,
    state::{AppState, AuthConfig},
};
use tarmac_store::{app_config::Config, EntityStore, JsonFileBackend, MemoryBackend, SharedStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tarmac_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Tarmac API on port {}", config.server.port);

    let store = match config.storage.data_dir.as_deref() {
        Some(dir) => {
            tracing::info!("Persisting collections under {}", dir);
            SharedStore::new(EntityStore::open(Box::new(JsonFileBackend::new(dir)))?)
        }
        None => SharedStore::new(EntityStore::open(Box::new(MemoryBackend::default()))?),
    };

    let app_state = AppState::new(
        store,
        AuthConfig {
            secret: config.auth.jwt_secret.clone(),
            expiration: config.auth.jwt_expiration_seconds,
        },
    );

    // First run seeds the admin account; the password is shown this once
    if let Some(issued) = app_state.staff.ensure_admin()? {
        tracing::info!(
            "Seeded admin account '{}' with one-time password: {}",
            issued.staff.username,
            issued.password
        );
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
