use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roomchat::{build_router, build_state, config::ChatConfig, AppState};

const SESSION_CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roomchat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ChatConfig::from_env();
    info!(
        history_capacity = config.history_capacity,
        assistant_remote = config.assistant_url.is_some(),
        default_rooms = ?config.default_rooms,
        "Starting room chat server"
    );

    let app_state = build_state(&config);
    spawn_session_cleanup(app_state.clone());

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodically drops expired sessions so their usernames become free again
fn spawn_session_cleanup(app_state: AppState) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_CLEANUP_INTERVAL);
        loop {
            interval.tick().await;
            match app_state.session_service.cleanup_expired_sessions().await {
                Ok(0) => {}
                Ok(removed) => info!(removed_count = removed, "Expired sessions cleaned up"),
                Err(e) => warn!(error = %e, "Session cleanup failed"),
            }
        }
    });
}
