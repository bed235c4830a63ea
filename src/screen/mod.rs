use serde::Serialize;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tokio::sync::RwLock;
use tracing::debug;

use crate::room::models::GameType;

/// Screens the client can show; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Screen {
    Start,
    Games,
    GameRoom,
}

/// What the game-room screen is currently showing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomView {
    pub room_id: String,
    pub game_type: GameType,
    pub title: String,
}

impl RoomView {
    pub fn new(room_id: String, game_type: GameType) -> Self {
        Self {
            room_id,
            game_type,
            title: game_type.title().to_string(),
        }
    }

    /// Only the board matching the room's game type is shown
    pub fn board_visible(&self, board: GameType) -> bool {
        self.game_type == board
    }
}

struct ScreenState {
    active: Screen,
    room: Option<RoomView>,
}

/// Tracks the active screen and the room view
pub struct ScreenController {
    state: RwLock<ScreenState>,
}

impl Default for ScreenController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenController {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(ScreenState {
                active: Screen::Start,
                room: None,
            }),
        }
    }

    pub async fn switch_to(&self, screen: Screen) {
        let mut state = self.state.write().await;
        debug!(from = %state.active, to = %screen, "Switching screen");
        state.active = screen;
    }

    pub async fn active(&self) -> Screen {
        self.state.read().await.active
    }

    pub async fn is_active(&self, screen: Screen) -> bool {
        self.active().await == screen
    }

    /// Activity marker for every screen, in declaration order
    pub async fn markers(&self) -> Vec<(Screen, bool)> {
        let active = self.active().await;
        Screen::iter().map(|s| (s, s == active)).collect()
    }

    /// Renders the room and switches to the game-room screen
    pub async fn show_room(&self, view: RoomView) {
        let mut state = self.state.write().await;
        debug!(room_id = %view.room_id, game_type = %view.game_type, "Showing game room");
        state.room = Some(view);
        state.active = Screen::GameRoom;
    }

    /// Drops the room view and returns to the games screen
    pub async fn close_room(&self) -> Option<RoomView> {
        let mut state = self.state.write().await;
        state.active = Screen::Games;
        state.room.take()
    }

    pub async fn current_room(&self) -> Option<RoomView> {
        self.state.read().await.room.clone()
    }
}
