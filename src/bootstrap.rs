use anyhow::Result;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{app_state::AppState, jobs};

pub fn init_tracing() {
    tracing_subscriber::fmt().with_target(false).compact().init();
}

pub fn init_env() {
    dotenvy::dotenv().ok();
}

/// Spawn the background jobs and serve the trigger routes until shutdown.
pub async fn bootstrap(service_name: &str, app: Router<AppState>, state: AppState) -> Result<()> {
    tokio::spawn(jobs::reminders::run(state.clone()));

    let app = app
        .with_state(state.clone())
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("{service_name} listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
