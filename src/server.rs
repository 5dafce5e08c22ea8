//! Web server implementation using Axum

use tokio::net::TcpListener;

use crate::{
    Config,
    routes::{AppState, router},
};

pub async fn serve(config: Config, host: String, port: u16) -> anyhow::Result<()> {
    let pool = crate::migrate::connect(&config).await?;
    crate::migrate::run_migrations(&pool).await?;

    let state = AppState {
        state: nutriplan_shared::State::new(pool),
        jwt_secret: config.jwt.secret.to_owned(),
        jwt_lifetime: config.jwt.lifetime_seconds(),
        key_policy: config.shopping.key_policy,
    };

    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(addr = %addr, key_policy = ?config.shopping.key_policy, "Server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
