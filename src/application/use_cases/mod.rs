mod chat;
mod forward_completion;
mod list_models;

pub use chat::*;
pub use forward_completion::*;
pub use list_models::*;
