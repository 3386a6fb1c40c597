use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, Config, SecurityHeaders};
use crate::handlers::{
    config_status, configure, create_event, get_event, health_check, list_categories,
    list_events, AppState,
};

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/api/config", get(config_status).post(configure))
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/:id", get(get_event))
        .route("/api/categories", get(list_categories))
        .with_state(state);

    SecurityHeaders::new(config.production)
        .apply(router)
        .layer(create_cors_layer(&config.cors_allowed_origins))
        .layer(TraceLayer::new_for_http())
}
