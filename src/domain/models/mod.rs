mod completion;
mod conversation_turn;
mod conversation_window;
mod model_info;

pub use completion::*;
pub use conversation_turn::*;
pub use conversation_window::*;
pub use model_info::*;
