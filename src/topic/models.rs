use serde::{Deserialize, Serialize};

use crate::shared::string_or_number;

/// Quiz topic used to populate the topic selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

impl Topic {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Topics offered when the backend has none or cannot be reached
    pub fn fallback() -> Vec<Topic> {
        vec![
            Topic::new("general", "General"),
            Topic::new("science", "Science"),
            Topic::new("history", "History"),
        ]
    }
}
