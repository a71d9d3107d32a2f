//! Ollama chat API client.

use super::{
    ChatMessage, chat_messages, endpoint_url, http_client, parse_tool_arguments, send_json,
};
use crate::function::domain::Provider;
use crate::strategy::{GenerationReply, GenerationRequest, StrategyResult, TextGenerationClient};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stateless client for `POST /api/chat` on an Ollama host.
#[derive(Debug, Clone, Copy, Default)]
pub struct OllamaClient;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
    #[serde(skip_serializing_if = "<[Value]>::is_empty")]
    tools: &'a [Value],
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
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
impl TextGenerationClient for OllamaClient {
    async fn generate(&self, request: &GenerationRequest) -> StrategyResult<GenerationReply> {
        let provider = Provider::Ollama;
        let body = ChatRequest {
            model: &request.model,
            messages: chat_messages(request),
            stream: false,
            options: ChatOptions {
                temperature: request.temperature,
                top_p: request.top_p,
                num_predict: request.max_tokens,
            },
            tools: &request.tools,
        };

        let http = http_client(provider)?
            .post(endpoint_url(&request.endpoint, "api/chat"))
            .json(&body);
        let response: ChatResponse = send_json(provider, http).await?;

        let tool_arguments = response
            .message
            .tool_calls
            .into_iter()
            .next()
            .map(|call| parse_tool_arguments(provider, call.function.arguments))
            .transpose()?;

        Ok(GenerationReply {
            text: response.message.content,
            tool_arguments,
        })
    }
}
