use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;

use crate::room::repository::InMemoryRoomRepository;
use crate::topic::{repository::InMemoryTopicRepository, Topic};

/// Failure the stub injects into every response until cleared
#[derive(Debug, Clone, PartialEq)]
pub enum StubFault {
    None,
    /// Sleep before answering normally
    Delay(Duration),
    /// Answer with this status and a plain-text body
    Status(StatusCode),
    /// Answer 200 with a body that is not JSON
    MalformedBody,
    /// Answer 200 with `{"error": message}`
    BackendError(String),
}

/// Shared stub state
#[derive(Clone)]
pub struct StubState {
    pub rooms: Arc<InMemoryRoomRepository>,
    pub topics: Arc<InMemoryTopicRepository>,
    fault: Arc<RwLock<StubFault>>,
}

impl Default for StubState {
    fn default() -> Self {
        Self::new()
    }
}

impl StubState {
    /// Empty rooms and topics
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(InMemoryRoomRepository::new()),
            topics: Arc::new(InMemoryTopicRepository::new()),
            fault: Arc::new(RwLock::new(StubFault::None)),
        }
    }

    /// Seeded with the same topics the client falls back to
    pub fn with_default_topics() -> Self {
        let state = Self::new();
        state.topics.set_topics(Topic::fallback());
        state
    }

    pub async fn set_fault(&self, fault: StubFault) {
        debug!(fault = ?fault, "Stub fault changed");
        *self.fault.write().await = fault;
    }

    /// Applies the current fault; returns the response to send instead, if any
    pub(super) async fn apply_fault(&self) -> Option<Response> {
        let fault = self.fault.read().await.clone();
        match fault {
            StubFault::None => None,
            StubFault::Delay(delay) => {
                tokio::time::sleep(delay).await;
                None
            }
            StubFault::Status(status) => Some((status, "Service unavailable").into_response()),
            StubFault::MalformedBody => {
                Some((StatusCode::OK, "<html><body>Moved</body></html>").into_response())
            }
            StubFault::BackendError(message) => {
                Some((StatusCode::OK, Json(json!({ "error": message }))).into_response())
            }
        }
    }
}
