use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// `{ "success": true, "data": ... }`
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// `{ "success": false, "error": "...", "code": "..." }`
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

pub fn success<T>(data: T) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::OK, data, None)
}

pub fn created<T>(data: T) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::CREATED, data, None)
}

pub fn success_with_message<T>(data: T, message: impl Into<String>) -> Response
where
    T: Serialize,
{
    with_status(StatusCode::OK, data, Some(message.into()))
}

fn with_status<T>(status: StatusCode, data: T, message: Option<String>) -> Response
where
    T: Serialize,
{
    let body = ApiResponse {
        success: true,
        data,
        message,
    };
    (status, Json(body)).into_response()
}

pub fn error(code: &str, message: impl Into<String>, status: StatusCode) -> Response {
    let body = ApiErrorResponse {
        success: false,
        error: message.into(),
        code: code.to_string(),
    };

    (status, Json(body)).into_response()
}
