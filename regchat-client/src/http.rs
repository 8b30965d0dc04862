//! HTTP client for the regulations inference API

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use regchat_core::config::ApiConfig;
use regchat_core::inference::InferenceBackend;

/// Error type for inference requests
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned status {0}")]
    Status(reqwest::StatusCode),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// API request format
#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
}

/// API response format
#[derive(Debug, Deserialize)]
struct QueryResponse {
    answer: String,
}

/// Client for the remote Q&A endpoint
pub struct HttpInference {
    client: Client,
    endpoint: String,
}

impl HttpInference {
    /// Create a client for `endpoint` with the given request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            endpoint: endpoint.into(),
        }
    }

    /// Create a client from the API configuration section
    pub fn from_config(api: &ApiConfig) -> Self {
        Self::new(api.endpoint.clone(), Duration::from_secs(api.timeout_secs))
    }

    /// Send one query and return the raw answer text.
    ///
    /// Non-2xx responses and transport failures both surface as errors;
    /// callers treat them uniformly.
    pub async fn query_answer(&self, query: &str) -> ClientResult<String> {
        debug!("sending query to {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&QueryRequest { query })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status(status));
        }

        let body: QueryResponse = response.json().await?;
        Ok(body.answer)
    }
}

#[async_trait]
impl InferenceBackend for HttpInference {
    async fn query(&self, query: &str) -> regchat_core::Result<String> {
        self.query_answer(query)
            .await
            .map_err(|e| regchat_core::Error::Inference(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_query_posts_json_and_parses_answer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/chat")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "query": "كم عدد الساعات المطلوبة للتخرج؟"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"answer": "144 ساعة معتمدة"}"#)
            .create_async()
            .await;

        let client = HttpInference::new(
            format!("{}/api/chat", server.url()),
            Duration::from_secs(5),
        );
        let answer = client
            .query_answer("كم عدد الساعات المطلوبة للتخرج؟")
            .await
            .unwrap();

        assert_eq!(answer, "144 ساعة معتمدة");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let client = HttpInference::new(
            format!("{}/api/chat", server.url()),
            Duration::from_secs(5),
        );
        let err = client.query_answer("anything").await.unwrap_err();
        assert!(matches!(err, ClientError::Status(status) if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpInference::new(
            format!("{}/api/chat", server.url()),
            Duration::from_secs(5),
        );
        assert!(client.query_answer("anything").await.is_err());
    }

    #[tokio::test]
    async fn test_trait_maps_failures_to_inference_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/chat")
            .with_status(503)
            .create_async()
            .await;

        let client = HttpInference::new(
            format!("{}/api/chat", server.url()),
            Duration::from_secs(5),
        );
        let err = InferenceBackend::query(&client, "anything").await.unwrap_err();
        assert!(matches!(err, regchat_core::Error::Inference(_)));
    }
}
