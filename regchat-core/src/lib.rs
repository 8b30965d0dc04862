//! Core types and logic for regchat
//!
//! This crate provides the chat data model, the answer/citation parser,
//! the session store state machine, and the persistence, configuration,
//! and logging plumbing used by the rest of the workspace.

pub mod config;
pub mod error;
pub mod inference;
pub mod lang;
pub mod logging;
pub mod parser;
pub mod session;
pub mod storage;

pub use error::{Error, Result};
