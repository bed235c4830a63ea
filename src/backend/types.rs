use serde_json::Value;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::shared::AppError;

/// Operations understood by the backend endpoint, sent as the `action` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum Action {
    GetTopics,
    GetAvailableRooms,
    GetRoom,
    UpdateRoom,
    SaveGameHistory,
}

impl Action {
    /// Whether the action is sent as a form-encoded POST rather than a GET
    pub fn is_write(&self) -> bool {
        matches!(self, Action::UpdateRoom | Action::SaveGameHistory)
    }
}

/// Rejects bodies that carry an `error` field, whatever else they contain
pub fn reject_error_field(value: Value) -> Result<Value, AppError> {
    match value.get("error") {
        Some(Value::Null) | None => Ok(value),
        Some(Value::String(message)) => Err(AppError::Backend(message.clone())),
        Some(other) => Err(AppError::Backend(other.to_string())),
    }
}
