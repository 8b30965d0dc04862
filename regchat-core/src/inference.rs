//! Seam for the outbound inference request

use async_trait::async_trait;

use crate::Result;

/// A backend that answers regulation questions.
///
/// The session store submits through this trait so it can be exercised in
/// tests without a network; the production implementation lives in
/// `regchat-client`.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Send one query and return the raw answer text.
    ///
    /// Transport failures and non-success responses are reported uniformly
    /// as [`crate::Error::Inference`].
    async fn query(&self, query: &str) -> Result<String>;
}
