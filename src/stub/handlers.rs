use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;
use tracing::{info, instrument};

use super::state::StubState;
use crate::backend::Action;
use crate::room::{
    models::GameType,
    repository::RoomRepository,
    types::{GameRecord, RoomData},
};
use crate::shared::AppError;
use crate::topic::repository::TopicRepository;

type Params = HashMap<String, String>;

/// HTTP handler for read actions
///
/// GET /exec?action=getTopics|getAvailableRooms|getRoom
#[instrument(name = "stub_get", skip(state))]
pub async fn handle_get(State(state): State<StubState>, Query(params): Query<Params>) -> Response {
    if let Some(response) = state.apply_fault().await {
        return response;
    }
    dispatch_read(&state, &params).await.into_response()
}

/// HTTP handler for write actions
///
/// POST /exec with a form body carrying `action=updateRoom|saveGameHistory`
#[instrument(name = "stub_post", skip(state))]
pub async fn handle_post(State(state): State<StubState>, Form(params): Form<Params>) -> Response {
    if let Some(response) = state.apply_fault().await {
        return response;
    }
    dispatch_write(&state, &params).await.into_response()
}

async fn dispatch_read(state: &StubState, params: &Params) -> Result<Response, AppError> {
    match action(params)? {
        Action::GetTopics => {
            let topics = state.topics.list_topics().await?;
            Ok(Json(topics).into_response())
        }
        Action::GetAvailableRooms => {
            let rooms = state.rooms.list_rooms(game_type(params)?).await?;
            info!(room_count = rooms.len(), "Stub listed rooms");
            Ok(Json(rooms).into_response())
        }
        Action::GetRoom => {
            let room_id = required(params, "roomId")?;
            let room = state
                .rooms
                .get_room(game_type(params)?, room_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Room not found".to_string()))?;
            Ok(Json(room).into_response())
        }
        other => Err(AppError::InvalidRequest(format!(
            "{} must be sent as POST",
            other
        ))),
    }
}

async fn dispatch_write(state: &StubState, params: &Params) -> Result<Response, AppError> {
    match action(params)? {
        Action::UpdateRoom => {
            let room_id = required(params, "roomId")?;
            let data: RoomData = json_field(params, "roomData")?;
            let result = state
                .rooms
                .update_room(game_type(params)?, room_id, &data)
                .await?;
            info!(room_id = %room_id, success = result.success, "Stub updated room");
            Ok(Json(result).into_response())
        }
        Action::SaveGameHistory => {
            let record: GameRecord = json_field(params, "gameData")?;
            let result = state.rooms.save_game_history(&record).await?;
            Ok(Json(result).into_response())
        }
        other => Err(AppError::InvalidRequest(format!(
            "{} must be sent as GET",
            other
        ))),
    }
}

fn required<'a>(params: &'a Params, key: &str) -> Result<&'a str, AppError> {
    params
        .get(key)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::InvalidRequest(format!("Missing parameter: {}", key)))
}

fn action(params: &Params) -> Result<Action, AppError> {
    let raw = required(params, "action")?;
    Action::from_str(raw).map_err(|_| AppError::InvalidRequest(format!("Unknown action: {}", raw)))
}

fn game_type(params: &Params) -> Result<GameType, AppError> {
    let raw = required(params, "gameType")?;
    GameType::from_str(raw)
        .map_err(|_| AppError::InvalidRequest(format!("Unknown game type: {}", raw)))
}

fn json_field<T: DeserializeOwned>(params: &Params, key: &str) -> Result<T, AppError> {
    serde_json::from_str(required(params, key)?)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid {}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use crate::room::models::{Room, RoomStatus};
    use crate::room::types::UpdateResult;
    use crate::stub::{router, StubFault, StubState};
    use crate::topic::Topic;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use std::time::Duration;
    use tower::ServiceExt; // for `oneshot`

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_form(body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/exec")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_topics() {
        let app = router(StubState::with_default_topics());

        let response = app.oneshot(get("/exec?action=getTopics")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let topics: Vec<Topic> = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(topics, Topic::fallback());
    }

    #[tokio::test]
    async fn test_update_room_form_then_get_room() {
        let state = StubState::new();

        let form = "action=updateRoom&gameType=tictactoe&roomId=1700000000000\
                    &roomData=%7B%22status%22%3A%22waiting%22%2C%22player1%22%3A%22Guest%22%7D";
        let response = router(state.clone())
            .oneshot(post_form(form.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let result: UpdateResult = serde_json::from_value(body_json(response).await).unwrap();
        assert!(result.success);
        assert_eq!(result.room_id.as_deref(), Some("1700000000000"));

        let response = router(state)
            .oneshot(get(
                "/exec?action=getRoom&gameType=tictactoe&roomId=1700000000000",
            ))
            .await
            .unwrap();
        let room: Room = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(room.status, RoomStatus::Waiting);
        assert_eq!(room.player1.as_deref(), Some("Guest"));
    }

    #[tokio::test]
    async fn test_missing_room_has_error_field() {
        let app = router(StubState::new());

        let response = app
            .oneshot(get("/exec?action=getRoom&gameType=connect4&roomId=nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"], "Room not found");
    }

    #[tokio::test]
    async fn test_unknown_action_and_game_type() {
        let response = router(StubState::new())
            .oneshot(get("/exec?action=dropTables"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "Unknown action: dropTables");

        let response = router(StubState::new())
            .oneshot(get("/exec?action=getAvailableRooms&gameType=chess"))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["error"], "Unknown game type: chess");
    }

    #[tokio::test]
    async fn test_write_action_over_get_rejected() {
        let response = router(StubState::new())
            .oneshot(get("/exec?action=updateRoom"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"],
            "updateRoom must be sent as POST"
        );
    }

    #[tokio::test]
    async fn test_invalid_room_data() {
        let response = router(StubState::new())
            .oneshot(post_form(
                "action=updateRoom&gameType=tictactoe&roomId=1&roomData=not-json".to_string(),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error = body_json(response).await["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Invalid roomData"));
    }

    #[tokio::test]
    async fn test_backend_error_fault() {
        let state = StubState::new();
        state
            .set_fault(StubFault::BackendError("Exceeded quota".to_string()))
            .await;

        let response = router(state)
            .oneshot(get("/exec?action=getTopics"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["error"], "Exceeded quota");
    }

    #[tokio::test]
    async fn test_status_fault_and_reset() {
        let state = StubState::with_default_topics();
        state
            .set_fault(StubFault::Status(StatusCode::BAD_GATEWAY))
            .await;

        let response = router(state.clone())
            .oneshot(get("/exec?action=getTopics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        state.set_fault(StubFault::None).await;
        let response = router(state)
            .oneshot(get("/exec?action=getTopics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_fault_still_answers() {
        let state = StubState::with_default_topics();
        state
            .set_fault(StubFault::Delay(Duration::from_secs(30)))
            .await;

        let response = router(state)
            .oneshot(get("/exec?action=getTopics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
