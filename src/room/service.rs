use chrono::Utc;
use reqwest::Url;
use serde::Serialize;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::{debug, info, instrument, warn};

use super::{
    models::{GameType, Room},
    repository::RoomRepository,
    types::{GameRecord, RoomCounts, RoomData, UpdateResult},
};
use crate::{
    notify::{NoticeLevel, Notifier},
    screen::{RoomView, Screen},
    shared::{AppError, AppState},
    topic::{Topic, TopicService},
};

/// Listing attempts made by a join before a rejected claim becomes final
const CLAIM_ATTEMPTS: u32 = 2;

static LAST_ROOM_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp id, strictly increasing within this process
fn next_room_id() -> String {
    let now = Utc::now().timestamp_millis();
    let previous = LAST_ROOM_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or(now);
    now.max(previous + 1).to_string()
}

/// What the start screen shows after connecting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub counts: RoomCounts,
    pub topics: Vec<Topic>,
}

enum ClaimOutcome {
    Claimed,
    Rejected(String),
    Failed(AppError),
}

/// Client-side room lifecycle over the backend endpoint.
///
/// Every public operation fails soft: errors are logged, shown to the user as
/// a notice, and replaced with a safe default value.
pub struct RoomClient {
    state: AppState,
    topics: TopicService,
}

impl RoomClient {
    pub fn new(state: AppState) -> Self {
        let topics = TopicService::new(
            state.topic_repository.clone(),
            state.notifier.clone(),
        );
        Self { state, topics }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Rooms open for joining; empty on any failure
    #[instrument(skip(self))]
    pub async fn list_rooms(&self, game_type: GameType) -> Vec<Room> {
        match self.state.room_repository.list_rooms(game_type).await {
            Ok(rooms) => {
                info!(room_count = rooms.len(), "Rooms listed");
                rooms
            }
            Err(e) => {
                self.report(
                    NoticeLevel::Error,
                    format!("Failed to load {} rooms: {}", game_type.title(), e),
                )
                .await;
                Vec::new()
            }
        }
    }

    /// A single room; `None` when missing or on any failure
    #[instrument(skip(self))]
    pub async fn get_room(&self, game_type: GameType, room_id: &str) -> Option<Room> {
        match self.state.room_repository.get_room(game_type, room_id).await {
            Ok(room) => room,
            Err(e) => {
                self.report(
                    NoticeLevel::Error,
                    format!("Failed to load room {}: {}", room_id, e),
                )
                .await;
                None
            }
        }
    }

    /// Creates or updates a room; the backend decides which by `room_id`
    #[instrument(skip(self, data))]
    pub async fn upsert_room(
        &self,
        game_type: GameType,
        room_id: &str,
        data: RoomData,
    ) -> UpdateResult {
        match self
            .state
            .room_repository
            .update_room(game_type, room_id, &data)
            .await
        {
            Ok(result) if result.success => {
                debug!(room_id = %room_id, "Room update accepted");
                result
            }
            Ok(result) => {
                self.report(
                    NoticeLevel::Error,
                    format!("Room update rejected: {}", rejection_reason(&result)),
                )
                .await;
                result
            }
            Err(e) => {
                self.report(NoticeLevel::Error, format!("Failed to update room: {}", e))
                    .await;
                UpdateResult::failed(e.to_string())
            }
        }
    }

    /// Posts a finished game to the history sheet; callers may ignore the result
    #[instrument(skip(self, record), fields(room_id = %record.room_id))]
    pub async fn record_game_outcome(&self, record: GameRecord) -> UpdateResult {
        match self.state.room_repository.save_game_history(&record).await {
            Ok(result) if result.success => {
                info!("Game history saved");
                result
            }
            Ok(result) => {
                self.report(
                    NoticeLevel::Error,
                    format!("Game history not saved: {}", rejection_reason(&result)),
                )
                .await;
                result
            }
            Err(e) => {
                self.report(
                    NoticeLevel::Error,
                    format!("Failed to save game history: {}", e),
                )
                .await;
                UpdateResult::failed(e.to_string())
            }
        }
    }

    /// Quiz topics, or the built-in defaults with a warning
    pub async fn list_topics(&self) -> Vec<Topic> {
        self.topics.list_topics().await
    }

    /// Takes the first open room of `game_type`, or opens a new one, then shows it.
    ///
    /// A claim rejected by the backend (someone else got the seat first)
    /// triggers one fresh listing before giving up.
    #[instrument(skip(self))]
    pub async fn join_game(&self, game_type: GameType) -> Option<RoomView> {
        let player = self.state.config.player_name.clone();
        self.notify(
            NoticeLevel::Info,
            format!("Joining {} room...", game_type.title()),
        )
        .await;

        let mut attempts_left = CLAIM_ATTEMPTS;
        let (room_id, created) = loop {
            let rooms = self.list_rooms(game_type).await;

            // First listed room wins; no preference among several
            let Some(room) = rooms.into_iter().next() else {
                break (self.create_room(game_type, &player).await?, true);
            };

            attempts_left -= 1;
            match self.claim_room(game_type, &room, &player).await {
                ClaimOutcome::Claimed => break (room.room_id, false),
                ClaimOutcome::Rejected(reason) if attempts_left > 0 => {
                    warn!(
                        room_id = %room.room_id,
                        reason = %reason,
                        "Claim rejected, listing rooms again"
                    );
                }
                ClaimOutcome::Rejected(reason) => {
                    self.report(
                        NoticeLevel::Error,
                        format!("Could not join room {}: {}", room.room_id, reason),
                    )
                    .await;
                    return None;
                }
                ClaimOutcome::Failed(e) => {
                    self.report(
                        NoticeLevel::Error,
                        format!("Could not join room {}: {}", room.room_id, e),
                    )
                    .await;
                    return None;
                }
            }
        };

        let view = RoomView::new(room_id, game_type);
        self.state.screens.show_room(view.clone()).await;

        let message = if created {
            format!("Created room {}. Waiting for an opponent...", view.room_id)
        } else {
            format!("Joined room {}", view.room_id)
        };
        info!(room_id = %view.room_id, created = created, "Entered game room");
        self.notify(NoticeLevel::Success, message).await;

        Some(view)
    }

    async fn claim_room(&self, game_type: GameType, room: &Room, player: &str) -> ClaimOutcome {
        let data = RoomData::claim(player, room.version);
        match self
            .state
            .room_repository
            .update_room(game_type, &room.room_id, &data)
            .await
        {
            Ok(result) if result.success => ClaimOutcome::Claimed,
            Ok(result) => ClaimOutcome::Rejected(rejection_reason(&result)),
            Err(e) => ClaimOutcome::Failed(e),
        }
    }

    /// Requests a new waiting room under a timestamp id; returns the id the backend settled on
    async fn create_room(&self, game_type: GameType, host: &str) -> Option<String> {
        let proposed_id = next_room_id();
        debug!(room_id = %proposed_id, "Creating room");

        let result = self
            .upsert_room(game_type, &proposed_id, RoomData::create_waiting(host))
            .await;

        if !result.success {
            return None;
        }
        Some(result.room_id.unwrap_or(proposed_id))
    }

    /// Start-up load: both room counts fetched concurrently, plus topics.
    ///
    /// A failed count reads as zero and does not affect the other.
    #[instrument(skip(self))]
    pub async fn load_dashboard(&self) -> Dashboard {
        let (tictactoe, connect4) = futures::join!(
            self.count_rooms(GameType::TicTacToe),
            self.count_rooms(GameType::Connect4)
        );
        let topics = self.list_topics().await;

        Dashboard {
            counts: RoomCounts {
                tictactoe,
                connect4,
            },
            topics,
        }
    }

    /// Manual re-run of the start-up load
    pub async fn retry_connection(&self) -> Dashboard {
        self.notify(NoticeLevel::Info, "Retrying connection...".to_string())
            .await;
        self.load_dashboard().await
    }

    async fn count_rooms(&self, game_type: GameType) -> usize {
        match self.state.room_repository.list_rooms(game_type).await {
            Ok(rooms) => rooms.len(),
            Err(e) => {
                self.report(
                    NoticeLevel::Warning,
                    format!("Could not count {} rooms: {}", game_type.title(), e),
                )
                .await;
                0
            }
        }
    }

    /// Leaves the current room view; the backend is not told
    #[instrument(skip(self))]
    pub async fn leave_game(&self) {
        let left = self.state.screens.close_room().await.map(|v| v.room_id);
        info!(room_id = ?left, "Left game room");
        self.notify(NoticeLevel::Info, "You left the game".to_string())
            .await;
    }

    /// Link other players can open to find the current room
    pub async fn share_room(&self) -> Option<String> {
        let Some(view) = self.state.screens.current_room().await else {
            self.notify(NoticeLevel::Warning, "No room to share".to_string())
                .await;
            return None;
        };

        let game = view.game_type.to_string();
        let link = match Url::parse_with_params(
            &self.state.config.share_base_url,
            &[("game", game.as_str()), ("room", view.room_id.as_str())],
        ) {
            Ok(url) => url.to_string(),
            Err(e) => {
                self.report(
                    NoticeLevel::Error,
                    format!("Invalid share URL {}: {}", self.state.config.share_base_url, e),
                )
                .await;
                return None;
            }
        };

        self.notify(NoticeLevel::Success, format!("Room link: {}", link))
            .await;
        Some(link)
    }

    pub async fn open_games(&self) {
        self.state.screens.switch_to(Screen::Games).await;
    }

    pub async fn back_to_start(&self) {
        self.state.screens.switch_to(Screen::Start).await;
    }

    async fn notify(&self, level: NoticeLevel, message: String) {
        self.state.notifier.notify(level, message).await;
    }

    async fn report(&self, level: NoticeLevel, message: String) {
        warn!(message = %message, "Room operation failed");
        self.notify(level, message).await;
    }
}

fn rejection_reason(result: &UpdateResult) -> String {
    result
        .message
        .clone()
        .unwrap_or_else(|| "no reason given".to_string())
}
