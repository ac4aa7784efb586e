use crate::error::{RagError, RagResult};
use crate::models::*;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// A hosted chat model. Returns the text of every choice, in the order received.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], sampling: &SamplingParams) -> RagResult<Vec<String>>;
}

pub fn build_http_client(timeout: Duration) -> RagResult<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RagError::Config(format!("failed to build HTTP client: {}", e)))
}

pub struct OpenAiChat {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(client: Client, base_url: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChat {
    async fn complete(&self, messages: &[ChatMessage], sampling: &SamplingParams) -> RagResult<Vec<String>> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            temperature: sampling.temperature,
            max_tokens: sampling.max_tokens,
            top_p: sampling.top_p,
            frequency_penalty: sampling.frequency_penalty,
            presence_penalty: sampling.presence_penalty,
        };

        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Completion(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(RagError::Completion(format!("{}: {}", status, error_text)));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| RagError::Completion(e.to_string()))?;

        Ok(completion
            .choices
            .into_iter()
            .map(|c| c.message.content.unwrap_or_default())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::spawn_stub_server;
    use axum::{
        http::{HeaderMap, StatusCode},
        routing::post,
        Json, Router,
    };
    use serde_json::{json, Value};

    fn chat(base_url: String) -> OpenAiChat {
        OpenAiChat::new(Client::new(), base_url, "sk-test", "gpt-3.5-turbo")
    }

    #[tokio::test]
    async fn sends_model_messages_and_sampling() {
        let app = Router::new().route(
            "/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer sk-test");
                assert_eq!(body["model"], "gpt-3.5-turbo");
                assert_eq!(body["messages"][0], json!({"role": "system", "content": "rules"}));
                assert_eq!(body["messages"][1], json!({"role": "user", "content": "hi"}));
                assert_eq!(body["temperature"], 1.0);
                assert_eq!(body["max_tokens"], 150);
                assert_eq!(body["top_p"], 1.0);
                assert_eq!(body["frequency_penalty"], 0.0);
                assert_eq!(body["presence_penalty"], 0.0);
                Json(json!({
                    "choices": [
                        {"index": 0, "message": {"role": "assistant", "content": "first"}},
                        {"index": 1, "message": {"role": "assistant", "content": null}}
                    ]
                }))
            }),
        );
        let base_url = spawn_stub_server(app).await;

        let choices = chat(base_url)
            .complete(
                &[ChatMessage::system("rules"), ChatMessage::user("hi")],
                &SamplingParams::default(),
            )
            .await
            .unwrap();
        assert_eq!(choices, vec!["first".to_string(), String::new()]);
    }

    #[tokio::test]
    async fn api_failure_carries_response_body() {
        let app = Router::new().route(
            "/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "Rate limit reached") }),
        );
        let base_url = spawn_stub_server(app).await;

        let err = chat(base_url)
            .complete(&[ChatMessage::user("hi")], &SamplingParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Completion(_)));
        assert!(err.to_string().contains("Rate limit reached"));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_completion_error() {
        let client = build_http_client(Duration::from_millis(500)).unwrap();
        let err = OpenAiChat::new(client, "http://127.0.0.1:9", "sk-test", "gpt-3.5-turbo")
            .complete(&[ChatMessage::user("hi")], &SamplingParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::Completion(_)));
    }
}
