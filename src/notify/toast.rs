use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{error, info, warn};

use super::{NoticeLevel, Notifier};

/// A notice posted to the board
#[derive(Debug, Clone)]
pub struct Toast {
    pub level: NoticeLevel,
    pub message: String,
    pub posted_at: Instant,
}

impl fmt::Display for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level, self.message)
    }
}

/// In-memory toast list; notices disappear from `active()` once older than the TTL
pub struct ToastBoard {
    ttl: Duration,
    toasts: RwLock<Vec<Toast>>,
}

impl ToastBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            toasts: RwLock::new(Vec::new()),
        }
    }

    /// Notices still within their display window, oldest first
    pub async fn active(&self) -> Vec<Toast> {
        let mut toasts = self.toasts.write().await;
        let ttl = self.ttl;
        toasts.retain(|t| t.posted_at.elapsed() < ttl);
        toasts.clone()
    }

    /// Most recent notice regardless of expiry
    pub async fn latest(&self) -> Option<Toast> {
        self.toasts.read().await.last().cloned()
    }

    /// Drains every posted notice, including expired ones not yet pruned
    pub async fn take_all(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.toasts.write().await)
    }
}

#[async_trait]
impl Notifier for ToastBoard {
    async fn notify(&self, level: NoticeLevel, message: String) {
        match level {
            NoticeLevel::Error => error!(message = %message, "User notice"),
            NoticeLevel::Warning => warn!(message = %message, "User notice"),
            NoticeLevel::Info | NoticeLevel::Success => {
                info!(level = %level, message = %message, "User notice")
            }
        }

        self.toasts.write().await.push(Toast {
            level,
            message,
            posted_at: Instant::now(),
        });
    }
}
