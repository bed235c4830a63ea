// Library crate for the roomlink game-room client
// This file exposes the public API for the binary and integration tests

pub mod backend;
pub mod config;
pub mod notify;
pub mod room;
pub mod screen;
pub mod shared;
pub mod stub;
pub mod topic;

// Re-export commonly used types for easier access in tests
pub use backend::BackendClient;
pub use config::ClientConfig;
pub use notify::{NoticeLevel, Notifier, ToastBoard};
pub use room::{
    models::{GameType, Room, RoomStatus},
    repository::{HttpRoomRepository, InMemoryRoomRepository, RoomRepository},
    Dashboard, RoomClient,
};
pub use screen::{RoomView, Screen, ScreenController};
pub use shared::{AppError, AppState};
pub use topic::{repository::HttpTopicRepository, Topic};

use std::sync::Arc;

/// Wires a RoomClient against the HTTP endpoint named in `config`
pub fn connect(config: ClientConfig) -> (RoomClient, Arc<ToastBoard>) {
    let backend = BackendClient::new(config.endpoint.clone());
    let toasts = Arc::new(ToastBoard::new(config.toast_ttl));

    let state = AppState::new(
        Arc::new(config.clone()),
        Arc::new(HttpRoomRepository::new(backend.clone(), &config)),
        Arc::new(HttpTopicRepository::new(backend, &config)),
        toasts.clone(),
        Arc::new(ScreenController::new()),
    );

    (RoomClient::new(state), toasts)
}
