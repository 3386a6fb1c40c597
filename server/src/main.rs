use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use campus_events_server::config::Config;
use campus_events_server::handlers::AppState;
use campus_events_server::routes::create_routes;
use campus_events_server::services::EventAccessService;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    let events = EventAccessService::new(config.request_timeout, config.date_policy)
        .expect("Failed to build events API client");

    match &config.events_api {
        Some(api) => events.configure(api.clone()),
        None => tracing::info!("EVENTS_API_URL not set, waiting for configuration via /api/config"),
    }

    let app = create_routes(AppState::new(events), &config);

    let addr = config.socket_addr();
    tracing::info!("Server running at http://{}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app).await.expect("Server failed");
}
