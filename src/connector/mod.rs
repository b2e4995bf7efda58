//! # Connector Layer
//!
//! External integrations implementing application interfaces:
//! - Upstream chat-completions transport (Groq over reqwest, plus a local mock)
//! - HTTP API (axum router, controllers, CORS)

pub mod adapter;
pub mod api;

pub use adapter::*;
