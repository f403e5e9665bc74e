use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use configs::{AppConfig, RateLimitConfig};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::{AppState, Repositories};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Longest configured window; idle keys older than this can be dropped.
fn longest_window(cfg: &RateLimitConfig) -> Duration {
    let secs = [cfg.api, cfg.public, cfg.assessment, cfg.bulk]
        .iter()
        .map(|r| r.window_secs)
        .max()
        .unwrap_or(3600);
    Duration::from_secs(secs)
}

/// Build the router against a live database.
pub fn build_app(cfg: &AppConfig, db: sea_orm::DatabaseConnection) -> (Router, AppState) {
    let repos = Repositories::seaorm(&db);
    let state = AppState::new(cfg, db, repos);
    (routes::build_router(state.clone(), build_cors()), state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(event = "signal_error", error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!(service = "server", event = "shutdown_signal", "received Ctrl+C, draining connections");
}

/// Public entry: connect, build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database).await?;
    let (app, state) = build_app(&cfg, db);

    state.limiter.spawn_cleanup(
        Duration::from_secs(cfg.rate_limit.cleanup_interval_secs),
        longest_window(&cfg.rate_limit),
    );

    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(service = "server", event = "listening", %addr, environment = %cfg.feature_flags.environment);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use configs::RateLimitRule;

    #[test]
    fn cleanup_window_covers_every_preset() {
        let mut cfg = RateLimitConfig::default();
        assert_eq!(longest_window(&cfg), Duration::from_secs(3600));
        cfg.bulk = RateLimitRule::new(10, 86_400);
        assert_eq!(longest_window(&cfg), Duration::from_secs(86_400));
    }
}
