//! Chat session management

pub mod manager;
pub mod store;

pub use manager::{ChatStore, PendingQuery, Status};
pub use store::{ChatMessage, ChatSession, Role};
