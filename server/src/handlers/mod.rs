use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{AccessConfig, EventCategory, NewEvent};
use crate::services::EventAccessService;
use crate::utils::error::AppError;
use crate::utils::response::{created, success, success_with_message};

#[derive(Clone)]
pub struct AppState {
    pub events: Arc<EventAccessService>,
}

impl AppState {
    pub fn new(events: EventAccessService) -> Self {
        Self {
            events: Arc::new(events),
        }
    }
}

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

#[derive(Serialize)]
pub struct ConfigStatus {
    pub configured: bool,
}

#[derive(Debug, Deserialize)]
pub struct EventFilter {
    pub category: Option<EventCategory>,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "campus-events-api",
    };

    success_with_message(payload, "Health check successful")
}

pub async fn config_status(State(state): State<AppState>) -> Response {
    success(ConfigStatus {
        configured: state.events.is_configured(),
    })
}

/// Accepts a configuration only after the events API answered a probe.
pub async fn configure(
    State(state): State<AppState>,
    payload: Result<Json<AccessConfig>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(config) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;

    let api_url = config.api_url.trim();
    if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
        return Err(AppError::ValidationError(
            "apiUrl must be an http(s) URL".to_string(),
        ));
    }

    state.events.probe(&config).await?;
    state.events.configure(config);

    Ok(success_with_message(
        ConfigStatus { configured: true },
        "Database configuration saved successfully",
    ))
}

pub async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> Result<Response, AppError> {
    let events = match filter.category {
        Some(category) => state.events.get_events_by_category(category).await?,
        None => state.events.list_events().await?,
    };
    Ok(success(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<NewEvent>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(event) = payload.map_err(|e| AppError::ValidationError(e.body_text()))?;

    if event.title.trim().is_empty() {
        return Err(AppError::ValidationError("Title is required".to_string()));
    }
    if event.end_date < event.start_date {
        return Err(AppError::ValidationError(
            "endDate must not be before startDate".to_string(),
        ));
    }

    let created_event = state.events.create_event(event).await?;
    Ok(created(created_event))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let event = state.events.get_event_by_id(&id).await?;
    Ok(success(event))
}

pub async fn list_categories() -> Response {
    success(EventCategory::ALL)
}
