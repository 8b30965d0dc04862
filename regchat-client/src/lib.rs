//! HTTP inference client for regchat
//!
//! Implements the [`regchat_core::inference::InferenceBackend`] seam over
//! the remote regulations Q&A API.

pub mod http;

pub use http::{ClientError, ClientResult, HttpInference};
