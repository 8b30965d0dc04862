//! Configuration management
//!
//! Handles loading and validation of regchat configuration from a JSON
//! file under the config directory.

pub mod loader;
pub mod schema;
pub mod validate;

pub use loader::ConfigLoader;
pub use schema::*;
