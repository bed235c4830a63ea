use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::shared::{optional_name, string_or_number};

/// Game a room is played in; the string form is the backend's `gameType` value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GameType {
    TicTacToe,
    Connect4,
}

impl GameType {
    /// Human-readable title for the room header
    pub fn title(&self) -> &'static str {
        match self {
            GameType::TicTacToe => "Tic-Tac-Toe",
            GameType::Connect4 => "Connect 4",
        }
    }
}

/// Room lifecycle as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RoomStatus {
    Waiting,
    Active,
}

/// A room as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "room_id", alias = "roomId", deserialize_with = "string_or_number")]
    pub room_id: String,
    pub status: RoomStatus,
    #[serde(default, deserialize_with = "optional_name", skip_serializing_if = "Option::is_none")]
    pub player1: Option<String>,
    #[serde(default, deserialize_with = "optional_name", skip_serializing_if = "Option::is_none")]
    pub player2: Option<String>,
    /// Present only when the backend supports optimistic concurrency
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
}

impl Room {
    pub fn player_count(&self) -> usize {
        self.player1.iter().chain(self.player2.iter()).count()
    }

    /// Both player slots are taken
    pub fn is_full(&self) -> bool {
        self.player_count() >= 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case("tictactoe", GameType::TicTacToe)]
    #[case("connect4", GameType::Connect4)]
    fn test_game_type_wire_names(#[case] raw: &str, #[case] expected: GameType) {
        assert_eq!(GameType::from_str(raw).unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }

    #[test]
    fn test_unknown_game_type_rejected() {
        assert!(GameType::from_str("chess").is_err());
    }

    #[test]
    fn test_room_from_spreadsheet_row() {
        let raw = r#"{"room_id": 1700000000000, "status": "waiting", "player1": "Guest", "player2": ""}"#;
        let room: Room = serde_json::from_str(raw).unwrap();

        assert_eq!(room.room_id, "1700000000000");
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.player1.as_deref(), Some("Guest"));
        assert_eq!(room.player2, None);
        assert_eq!(room.version, None);
        assert_eq!(room.player_count(), 1);
        assert!(!room.is_full());
    }

    #[test]
    fn test_room_accepts_camel_case_id_and_version() {
        let raw = r#"{"roomId": "abc", "status": "active", "player1": "A", "player2": "B", "version": 3}"#;
        let room: Room = serde_json::from_str(raw).unwrap();

        assert_eq!(room.room_id, "abc");
        assert_eq!(room.status, RoomStatus::Active);
        assert_eq!(room.version, Some(3));
        assert!(room.is_full());
    }

    #[test]
    fn test_unknown_status_is_malformed() {
        let raw = r#"{"room_id": "abc", "status": "closed"}"#;
        assert!(serde_json::from_str::<Room>(raw).is_err());
    }
}
