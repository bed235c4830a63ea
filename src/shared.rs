use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::notify::Notifier;
use crate::room::repository::RoomRepository;
use crate::screen::ScreenController;
use crate::topic::repository::TopicRepository;

/// Shared client state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ClientConfig>,
    pub room_repository: Arc<dyn RoomRepository + Send + Sync>,
    pub topic_repository: Arc<dyn TopicRepository + Send + Sync>,
    pub notifier: Arc<dyn Notifier>,
    pub screens: Arc<ScreenController>,
}

impl AppState {
    pub fn new(
        config: Arc<ClientConfig>,
        room_repository: Arc<dyn RoomRepository + Send + Sync>,
        topic_repository: Arc<dyn TopicRepository + Send + Sync>,
        notifier: Arc<dyn Notifier>,
        screens: Arc<ScreenController>,
    ) -> Self {
        Self {
            config,
            room_repository,
            topic_repository,
            notifier,
            screens,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Server responded with HTTP {0}")]
    HttpStatus(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Backend(msg) => (StatusCode::OK, msg),
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}

/// Accepts a JSON string or number and yields a string.
///
/// Spreadsheet cells holding ids such as `1700000000000` come back as numbers.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
        Raw::Float(f) if f.fract() == 0.0 => format!("{}", f as i64),
        Raw::Float(f) => f.to_string(),
    })
}

/// Like [`string_or_number`] but maps null, absent and empty values to `None`
pub fn optional_name<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
