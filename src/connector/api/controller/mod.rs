mod chat_controller;
mod models_controller;
mod status_controller;

pub use chat_controller::*;
pub use models_controller::*;
pub use status_controller::*;
