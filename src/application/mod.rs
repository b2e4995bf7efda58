//! # Application Layer
//!
//! Use cases coordinating the conversation window with the upstream chat client.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
