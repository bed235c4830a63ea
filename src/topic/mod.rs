// Public API - what other modules can use
pub use models::Topic;
pub use service::{TopicService, TOPICS_FALLBACK_WARNING};

pub mod models;
pub mod repository;
mod service;
