//! HttpAnswerService - HTTP client for the retrieval-augmented answer
//! backend.
//!
//! The backend is a black box: given a question and a domain-scoped
//! collection, it returns an answer string or fails. Per-domain routing
//! comes from [`RoutingConfig`]; a bounded request timeout guarantees an
//! unresponsive backend resolves to a failure instead of hanging the
//! in-flight send.

use crate::config::RoutingConfig;
use aerochat_core::answer::AnswerService;
use aerochat_core::error::{AerochatError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

/// AnswerService implementation that talks to the retrieval backend over
/// HTTP.
pub struct HttpAnswerService {
    client: Client,
    config: RoutingConfig,
}

impl HttpAnswerService {
    /// Creates a new service with the provided routing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RoutingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| AerochatError::internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Creates a service from the default routing config location.
    pub fn from_default_config() -> Result<Self> {
        Self::new(RoutingConfig::load_default()?)
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    async fn ask(&self, domain: &str, question: &str) -> Result<String> {
        let backend = self.config.backend(domain).ok_or_else(|| {
            AerochatError::remote_answer(format!(
                "no answer backend configured for domain '{}'",
                domain
            ))
        })?;

        let mut request = self.client.post(&backend.url).json(&AskRequest {
            question,
            collection: &backend.collection,
        });
        if let Some(api_key) = &backend.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                AerochatError::remote_answer("answer service timed out")
            } else {
                AerochatError::remote_answer(format!("answer request failed: {}", err))
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read error body".to_string());
            return Err(map_http_error(status, body));
        }

        let parsed: AskResponse = response.json().await.map_err(|err| {
            AerochatError::remote_answer(format!("failed to parse answer response: {}", err))
        })?;

        Ok(parsed.answer)
    }
}

#[derive(Serialize)]
struct AskRequest<'a> {
    question: &'a str,
    collection: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    answer: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn map_http_error(status: StatusCode, body: String) -> AerochatError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);
    AerochatError::remote_answer(format!(
        "answer service returned {}: {}",
        status.as_u16(),
        message
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unrouted_domain_is_a_remote_answer_error() {
        let service = HttpAnswerService::new(RoutingConfig::default()).unwrap();

        let err = service.ask("a320", "what is MEL?").await.unwrap_err();
        assert!(err.is_remote_answer());
    }

    #[test]
    fn test_map_http_error_prefers_structured_message() {
        let err = map_http_error(
            StatusCode::BAD_GATEWAY,
            r#"{"error":{"message":"retriever offline"}}"#.to_string(),
        );
        assert!(err.to_string().contains("retriever offline"));
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_map_http_error_falls_back_to_raw_body() {
        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
        assert!(err.to_string().contains("boom"));
    }
}
