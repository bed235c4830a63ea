use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use super::models::{GameType, Room, RoomStatus};
use super::types::{GameRecord, RoomData, UpdateResult};
use crate::backend::{Action, BackendClient};
use crate::config::ClientConfig;
use crate::shared::AppError;

/// Message returned when a claim carries a stale version
pub const VERSION_CONFLICT_MESSAGE: &str = "Room was modified by another player";

/// Trait for room storage operations
#[async_trait]
pub trait RoomRepository {
    /// Rooms open for joining, in the order the store returns them
    async fn list_rooms(&self, game_type: GameType) -> Result<Vec<Room>, AppError>;
    async fn get_room(&self, game_type: GameType, room_id: &str)
        -> Result<Option<Room>, AppError>;

    /// Creates the room if `room_id` is unknown, otherwise merges `data` into it
    async fn update_room(
        &self,
        game_type: GameType,
        room_id: &str,
        data: &RoomData,
    ) -> Result<UpdateResult, AppError>;

    async fn save_game_history(&self, record: &GameRecord) -> Result<UpdateResult, AppError>;
}

/// Room repository backed by the remote endpoint
pub struct HttpRoomRepository {
    backend: BackendClient,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl HttpRoomRepository {
    pub fn new(backend: BackendClient, config: &ClientConfig) -> Self {
        Self {
            backend,
            read_timeout: config.list_timeout,
            write_timeout: config.write_timeout,
        }
    }
}

#[async_trait]
impl RoomRepository for HttpRoomRepository {
    #[instrument(skip(self))]
    async fn list_rooms(&self, game_type: GameType) -> Result<Vec<Room>, AppError> {
        let game_type = game_type.to_string();
        let rooms: Vec<Room> = self
            .backend
            .get(
                Action::GetAvailableRooms,
                &[("gameType", game_type.as_str())],
                self.read_timeout,
            )
            .await?;

        debug!(room_count = rooms.len(), "Rooms fetched from backend");
        Ok(rooms)
    }

    #[instrument(skip(self))]
    async fn get_room(
        &self,
        game_type: GameType,
        room_id: &str,
    ) -> Result<Option<Room>, AppError> {
        let game_type = game_type.to_string();
        let room: Option<Room> = self
            .backend
            .get(
                Action::GetRoom,
                &[("gameType", game_type.as_str()), ("roomId", room_id)],
                self.read_timeout,
            )
            .await?;

        Ok(room)
    }

    #[instrument(skip(self, data))]
    async fn update_room(
        &self,
        game_type: GameType,
        room_id: &str,
        data: &RoomData,
    ) -> Result<UpdateResult, AppError> {
        let room_data =
            serde_json::to_string(data).map_err(|e| AppError::InvalidRequest(e.to_string()))?;

        self.backend
            .post_form(
                Action::UpdateRoom,
                &[
                    ("gameType", game_type.to_string()),
                    ("roomId", room_id.to_string()),
                    ("roomData", room_data),
                ],
                self.write_timeout,
            )
            .await
    }

    #[instrument(skip(self, record), fields(room_id = %record.room_id))]
    async fn save_game_history(&self, record: &GameRecord) -> Result<UpdateResult, AppError> {
        let game_data =
            serde_json::to_string(record).map_err(|e| AppError::InvalidRequest(e.to_string()))?;

        self.backend
            .post_form(
                Action::SaveGameHistory,
                &[("gameData", game_data)],
                self.write_timeout,
            )
            .await
    }
}

struct StoredRoom {
    game_type: GameType,
    room: Room,
}

/// In-memory implementation of RoomRepository for the stub backend and tests.
///
/// Rooms keep their creation order; every stored room carries a version
/// that is bumped on each successful update.
pub struct InMemoryRoomRepository {
    rooms: Mutex<Vec<StoredRoom>>,
    history: Mutex<Vec<GameRecord>>,
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRoomRepository {
    /// Creates a new empty in-memory repository
    pub fn new() -> Self {
        Self {
            rooms: Mutex::new(Vec::new()),
            history: Mutex::new(Vec::new()),
        }
    }

    /// Every stored room of a type regardless of status
    pub fn all_rooms(&self, game_type: GameType) -> Vec<Room> {
        let rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        rooms
            .iter()
            .filter(|stored| stored.game_type == game_type)
            .map(|stored| stored.room.clone())
            .collect()
    }

    pub fn history(&self) -> Vec<GameRecord> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    #[instrument(skip(self))]
    async fn list_rooms(&self, game_type: GameType) -> Result<Vec<Room>, AppError> {
        let rooms: Vec<Room> = self
            .all_rooms(game_type)
            .into_iter()
            .filter(|room| room.status == RoomStatus::Waiting)
            .collect();

        debug!(room_count = rooms.len(), "Waiting rooms listed from memory");
        Ok(rooms)
    }

    #[instrument(skip(self))]
    async fn get_room(
        &self,
        game_type: GameType,
        room_id: &str,
    ) -> Result<Option<Room>, AppError> {
        let rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        let room = rooms
            .iter()
            .find(|stored| stored.game_type == game_type && stored.room.room_id == room_id)
            .map(|stored| stored.room.clone());

        match &room {
            Some(r) => debug!(room_id = %room_id, status = %r.status, "Room found in memory"),
            None => debug!(room_id = %room_id, "Room not found in memory"),
        }

        Ok(room)
    }

    #[instrument(skip(self, data))]
    async fn update_room(
        &self,
        game_type: GameType,
        room_id: &str,
        data: &RoomData,
    ) -> Result<UpdateResult, AppError> {
        if room_id.trim().is_empty() {
            return Err(AppError::InvalidRequest("roomId is required".to_string()));
        }

        let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());

        let existing = rooms
            .iter_mut()
            .find(|stored| stored.game_type == game_type && stored.room.room_id == room_id);

        let Some(stored) = existing else {
            let room = Room {
                room_id: room_id.to_string(),
                status: data.status.unwrap_or(RoomStatus::Waiting),
                player1: data.player1.clone(),
                player2: data.player2.clone(),
                version: Some(1),
            };
            rooms.push(StoredRoom { game_type, room });

            info!(room_id = %room_id, game_type = %game_type, "Room created in memory");
            return Ok(UpdateResult::ok(Some(room_id.to_string())));
        };

        let current_version = stored.room.version.unwrap_or(0);
        if let Some(expected) = data.version {
            if expected != current_version {
                warn!(
                    room_id = %room_id,
                    expected_version = expected,
                    current_version = current_version,
                    "Rejected room update with stale version"
                );
                return Ok(UpdateResult::failed(VERSION_CONFLICT_MESSAGE));
            }
        }

        if let Some(status) = data.status {
            stored.room.status = status;
        }
        if let Some(player1) = &data.player1 {
            stored.room.player1 = Some(player1.clone());
        }
        if let Some(player2) = &data.player2 {
            stored.room.player2 = Some(player2.clone());
        }
        stored.room.version = Some(current_version + 1);

        info!(
            room_id = %room_id,
            status = %stored.room.status,
            version = current_version + 1,
            "Room updated in memory"
        );

        Ok(UpdateResult::ok(Some(room_id.to_string())))
    }

    #[instrument(skip(self, record), fields(room_id = %record.room_id))]
    async fn save_game_history(&self, record: &GameRecord) -> Result<UpdateResult, AppError> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(record.clone());

        debug!("Game history saved in memory");
        Ok(UpdateResult::ok(None))
    }
}
