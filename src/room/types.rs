use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::{GameType, RoomStatus};

/// Partial room update sent as the `roomData` form field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2: Option<String>,
    /// Version the client last saw; a mismatch is rejected by backends that track versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl RoomData {
    /// Payload for creating a room that waits for an opponent
    pub fn create_waiting(host: &str) -> Self {
        Self {
            status: Some(RoomStatus::Waiting),
            player1: Some(host.to_string()),
            ..Self::default()
        }
    }

    /// Payload for taking the second seat of a waiting room
    pub fn claim(guest: &str, version: Option<u64>) -> Self {
        Self {
            status: Some(RoomStatus::Active),
            player2: Some(guest.to_string()),
            version,
            ..Self::default()
        }
    }
}

/// Backend answer to `updateRoom` and `saveGameHistory`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateResult {
    #[serde(default)]
    pub success: bool,
    #[serde(
        rename = "roomId",
        default,
        deserialize_with = "crate::shared::optional_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UpdateResult {
    pub fn ok(room_id: Option<String>) -> Self {
        Self {
            success: true,
            room_id,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            room_id: None,
            message: Some(message.into()),
        }
    }
}

/// Finished game entry sent as the `gameData` form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_type: GameType,
    pub room_id: String,
    pub player1: String,
    pub player2: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    pub finished_at: DateTime<Utc>,
}

/// Listed room count per game type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoomCounts {
    pub tictactoe: usize,
    pub connect4: usize,
}

impl RoomCounts {
    pub fn get(&self, game_type: GameType) -> usize {
        match game_type {
            GameType::TicTacToe => self.tictactoe,
            GameType::Connect4 => self.connect4,
        }
    }
}
