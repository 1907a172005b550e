use std::sync::Arc;

use admin_api::{
    auth::TokenCodec,
    config::Config,
    repos::{create_pool, run_migrations},
    rest, seed_admin,
    storage::LocalBlobStore,
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "admin_api=debug,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url, 5).await?;
    run_migrations(&pool).await?;

    if let Some(admin) = &config.initial_admin {
        match seed_admin(&pool, admin).await? {
            Some(user_id) => tracing::info!(user_id, email = %admin.email, "seeded admin account"),
            None => tracing::debug!(email = %admin.email, "admin account already present"),
        }
    }

    tokio::fs::create_dir_all(&config.media_root).await?;

    let tokens = TokenCodec::new(
        config.jwt_secret.as_bytes(),
        chrono::Duration::hours(config.token_ttl_hours),
    );
    let app_state = AppState {
        db: pool,
        tokens: Arc::new(tokens),
        blobs: Arc::new(LocalBlobStore::new(config.media_root.clone())),
    };

    let app = rest::router(app_state, &config.media_root, config.max_upload_bytes);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("admin API listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
