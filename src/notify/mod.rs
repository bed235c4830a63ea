// Public API - what other modules can use
pub use toast::{Toast, ToastBoard};

mod toast;

use async_trait::async_trait;
use strum_macros::Display;

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Surface for transient messages shown to the user
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, level: NoticeLevel, message: String);
}
