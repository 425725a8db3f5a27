use anyhow::Result;
use axum::Router;
use clinicbook_notifyservice::{app_state::AppState, bootstrap, config, routes, swagger};

#[tokio::main]
async fn main() -> Result<()> {
    bootstrap::init_tracing();
    bootstrap::init_env();

    let routes = routes::triggers::routes_with_openapi();

    let mut openapi = routes.get_openapi().clone();
    openapi.info = utoipa::openapi::InfoBuilder::new()
        .title("ClinicBook NotifyService API")
        .version("1.0.0")
        .build();
    let swagger_ui = swagger::create_swagger_ui(openapi);

    let app = Router::new().merge(routes).merge(swagger_ui);

    let config = config::load()?;
    let state = AppState::new(config);

    tracing::info!("Bootstrapping...");
    bootstrap::bootstrap("NotifyService", app, state).await?;
    Ok(())
}
