//! Perplexity chat completions client (OpenAI-compatible).

use super::{
    ChatMessage, chat_messages, endpoint_url, http_client, parse_tool_arguments, send_json,
};
use crate::function::domain::Provider;
use crate::strategy::{
    GenerationReply, GenerationRequest, StrategyError, StrategyResult, TextGenerationClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stateless client for `POST /chat/completions`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PerplexityClient;

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "<[Value]>::is_empty")]
    tools: &'a [Value],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: ToolFunction,
}

#[derive(Debug, Deserialize)]
struct ToolFunction {
    arguments: Value,
}

#[async_trait]
impl TextGenerationClient for PerplexityClient {
    async fn generate(&self, request: &GenerationRequest) -> StrategyResult<GenerationReply> {
        let provider = Provider::Perplexity;
        let credential = request
            .credential
            .as_deref()
            .ok_or(StrategyError::CredentialMissing { provider })?;

        let body = CompletionRequest {
            model: &request.model,
            messages: chat_messages(request),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            top_p: request.top_p,
            tools: &request.tools,
        };

        let http = http_client(provider)?
            .post(endpoint_url(&request.endpoint, "chat/completions"))
            .bearer_auth(credential)
            .json(&body);
        let response: CompletionResponse = send_json(provider, http).await?;

        let message = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| StrategyError::provider(provider, "response contained no choices"))?;

        let tool_arguments = message
            .tool_calls
            .into_iter()
            .next()
            .map(|call| parse_tool_arguments(provider, call.function.arguments))
            .transpose()?;

        Ok(GenerationReply {
            text: message.content,
            tool_arguments,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(endpoint: String) -> GenerationRequest {
        GenerationRequest {
            endpoint,
            credential: Some("pplx-test".to_owned()),
            model: "sonar-small-online".to_owned(),
            system_prompt: None,
            prompt: "What is new in Rust?".to_owned(),
            temperature: None,
            max_tokens: None,
            top_p: None,
            tools: Vec::new(),
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn sends_bearer_request_and_reads_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer pplx-test"))
            .and(body_partial_json(json!({
                "model": "sonar-small-online",
                "messages": [{"role": "user", "content": "What is new in Rust?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Edition 2024."}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = PerplexityClient
            .generate(&request(server.uri()))
            .await
            .expect("request should succeed");

        assert_eq!(reply.text.as_deref(), Some("Edition 2024."));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn parses_tool_call_arguments_from_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {
                    "content": null,
                    "tool_calls": [{"function": {"name": "rate", "arguments": "{\"score\": 4}"}}]
                }}]
            })))
            .mount(&server)
            .await;

        let reply = PerplexityClient
            .generate(&request(server.uri()))
            .await
            .expect("request should succeed");

        assert_eq!(reply.tool_arguments, Some(json!({"score": 4})));
        assert_eq!(reply.text, None);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_choices_is_a_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let result = PerplexityClient.generate(&request(server.uri())).await;
        assert!(matches!(
            result,
            Err(StrategyError::Provider {
                provider: Provider::Perplexity,
                ..
            })
        ));
    }
}
