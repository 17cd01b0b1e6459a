//! Request handlers for the HTTP surface

pub mod api;
pub mod auth;

// Re-export the shared token extractor
pub use auth::extract_session_token;
