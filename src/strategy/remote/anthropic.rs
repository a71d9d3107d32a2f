//! Anthropic messages API client.

use super::{endpoint_url, http_client, parse_tool_arguments, send_json};
use crate::function::domain::Provider;
use crate::strategy::{
    GenerationReply, GenerationRequest, StrategyError, StrategyResult, TextGenerationClient,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Stateless client for `POST /v1/messages`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicClient;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    messages: [UserMessage<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "<[Value]>::is_empty")]
    tools: &'a [Value],
}

#[derive(Debug, Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<Value>,
}

#[async_trait]
impl TextGenerationClient for AnthropicClient {
    async fn generate(&self, request: &GenerationRequest) -> StrategyResult<GenerationReply> {
        let provider = Provider::Anthropic;
        let credential = request
            .credential
            .as_deref()
            .ok_or(StrategyError::CredentialMissing { provider })?;

        let body = MessagesRequest {
            model: &request.model,
            max_tokens: request.max_tokens,
            messages: [UserMessage {
                role: "user",
                content: &request.prompt,
            }],
            system: request.system_prompt.as_deref(),
            temperature: request.temperature,
            top_p: request.top_p,
            tools: &request.tools,
        };

        let http = http_client(provider)?
            .post(endpoint_url(&request.endpoint, "v1/messages"))
            .header("x-api-key", credential)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body);
        let response: MessagesResponse = send_json(provider, http).await?;

        let tool_arguments = response
            .content
            .iter()
            .find(|block| {
                block.kind == "tool_use" && block.name.as_deref().is_some_and(|n| !n.is_empty())
            })
            .and_then(|block| block.input.clone())
            .map(|input| parse_tool_arguments(provider, input))
            .transpose()?;

        let text = response
            .content
            .into_iter()
            .find_map(|block| block.text.filter(|_| block.kind == "text"));

        Ok(GenerationReply {
            text,
            tool_arguments,
        })
    }
}
