// Public API - what other modules can use
pub use client::BackendClient;
pub use types::Action;

// Internal modules
mod client;
mod types;
