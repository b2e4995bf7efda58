//! # Domain Layer
//!
//! Conversation model, completion payloads and the relay error taxonomy.
//! This layer is independent of HTTP frameworks and transport clients.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
