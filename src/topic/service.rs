use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::{models::Topic, repository::TopicRepository};
use crate::notify::{NoticeLevel, Notifier};

pub const TOPICS_FALLBACK_WARNING: &str = "Using default topics";

/// Loads quiz topics, substituting the built-in list when the backend has none
pub struct TopicService {
    repository: Arc<dyn TopicRepository + Send + Sync>,
    notifier: Arc<dyn Notifier>,
}

impl TopicService {
    pub fn new(
        repository: Arc<dyn TopicRepository + Send + Sync>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    #[instrument(skip(self))]
    pub async fn list_topics(&self) -> Vec<Topic> {
        let reason = match self.repository.list_topics().await {
            Ok(topics) if !topics.is_empty() => {
                info!(topic_count = topics.len(), "Topics loaded");
                return topics;
            }
            Ok(_) => "No topics available from server".to_string(),
            Err(e) => format!("Could not load topics: {}", e),
        };

        warn!(reason = %reason, "Falling back to default topics");
        self.notifier
            .notify(
                NoticeLevel::Warning,
                format!("{}. {}.", reason, TOPICS_FALLBACK_WARNING),
            )
            .await;

        Topic::fallback()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastBoard;
    use crate::shared::test_utils::StaticTopicRepository;
    use crate::shared::AppError;
    use crate::topic::repository::InMemoryTopicRepository;
    use std::time::Duration;

    fn toasts() -> Arc<ToastBoard> {
        Arc::new(ToastBoard::new(Duration::from_secs(5)))
    }

    #[tokio::test]
    async fn test_backend_topics_returned_as_is() {
        let board = toasts();
        let repo = Arc::new(InMemoryTopicRepository::with_topics(vec![
            Topic::new("1", "Geography"),
            Topic::new("2", "Music"),
        ]));
        let service = TopicService::new(repo, board.clone());

        let topics = service.list_topics().await;

        assert_eq!(topics.len(), 2);
        assert_eq!(topics[0].name, "Geography");
        assert!(board.latest().await.is_none());
    }

    #[tokio::test]
    async fn test_empty_backend_falls_back_with_warning() {
        let board = toasts();
        let service = TopicService::new(Arc::new(InMemoryTopicRepository::new()), board.clone());

        let topics = service.list_topics().await;

        assert_eq!(topics, Topic::fallback());
        let toast = board.latest().await.unwrap();
        assert_eq!(toast.level, NoticeLevel::Warning);
        assert!(toast.message.contains(TOPICS_FALLBACK_WARNING));
    }

    #[tokio::test]
    async fn test_backend_error_falls_back_with_cause() {
        let board = toasts();
        let repo = Arc::new(StaticTopicRepository {
            result: Err(AppError::Backend("Sheet not found".to_string())),
        });
        let service = TopicService::new(repo, board.clone());

        let topics = service.list_topics().await;

        assert_eq!(topics, Topic::fallback());
        let toast = board.latest().await.unwrap();
        assert_eq!(toast.level, NoticeLevel::Warning);
        assert!(toast.message.contains("Sheet not found"));
    }
}
