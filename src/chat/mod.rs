pub mod models;
pub mod session;

pub use models::{ChatMessage, ChatRole, Transcript};
pub use session::{ChatSession, ChatSessionBuilder};
