// Public API - what other modules can use
pub use service::{Dashboard, RoomClient};

// Internal modules
pub mod models;
pub mod repository;
mod service;
pub mod types;
