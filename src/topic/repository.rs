use async_trait::async_trait;
use std::sync::RwLock;
use std::time::Duration;
use tracing::{debug, instrument};

use super::models::Topic;
use crate::backend::{Action, BackendClient};
use crate::config::ClientConfig;
use crate::shared::AppError;

/// Trait for topic lookups
#[async_trait]
pub trait TopicRepository {
    async fn list_topics(&self) -> Result<Vec<Topic>, AppError>;
}

/// Topic repository backed by the remote endpoint
pub struct HttpTopicRepository {
    backend: BackendClient,
    timeout: Duration,
}

impl HttpTopicRepository {
    pub fn new(backend: BackendClient, config: &ClientConfig) -> Self {
        Self {
            backend,
            timeout: config.topics_timeout,
        }
    }
}

#[async_trait]
impl TopicRepository for HttpTopicRepository {
    #[instrument(skip(self))]
    async fn list_topics(&self) -> Result<Vec<Topic>, AppError> {
        let topics: Vec<Topic> = self
            .backend
            .get(Action::GetTopics, &[], self.timeout)
            .await?;

        debug!(topic_count = topics.len(), "Topics fetched from backend");
        Ok(topics)
    }
}

/// In-memory topic list for the stub backend and tests
#[derive(Default)]
pub struct InMemoryTopicRepository {
    topics: RwLock<Vec<Topic>>,
}

impl InMemoryTopicRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_topics(topics: Vec<Topic>) -> Self {
        Self {
            topics: RwLock::new(topics),
        }
    }

    pub fn set_topics(&self, topics: Vec<Topic>) {
        *self.topics.write().unwrap_or_else(|e| e.into_inner()) = topics;
    }
}

#[async_trait]
impl TopicRepository for InMemoryTopicRepository {
    async fn list_topics(&self) -> Result<Vec<Topic>, AppError> {
        Ok(self
            .topics
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}
