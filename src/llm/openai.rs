//! OpenAI-compatible chat.completions client.
//!
//! The whole prompt goes out as one user message; we return the first choice's text.
//! Calls log model name, latency and token usage (not contents).

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{status_error, CourseModel, LlmError};

#[derive(Clone)]
pub struct OpenAI {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

#[async_trait]
impl CourseModel for OpenAI {
  fn name(&self) -> &str { &self.model }

  #[instrument(level = "info", target = "llm", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![ChatMessageReq { role: "user".into(), content: prompt.into() }],
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      return Err(status_error(res).await);
    }

    let body: ChatCompletionResponse = res.json().await?;
    if let Some(usage) = &body.usage {
      info!(target: "llm", prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = first_choice_text(body)?;
    info!(target: "llm", elapsed = ?start.elapsed(), response_len = text.len(), "OpenAI response received");
    Ok(text)
  }
}

/// First choice's text. A filtered choice or no choice at all is an error;
/// a normally finished choice with null content yields an empty string.
fn first_choice_text(body: ChatCompletionResponse) -> Result<String, LlmError> {
  let choice = body.choices.into_iter().next().ok_or_else(|| LlmError::Empty("no choices".into()))?;
  let text = choice.message.content.unwrap_or_default();
  if text.is_empty() && choice.finish_reason.as_deref() == Some("content_filter") {
    return Err(LlmError::Empty("finish reason content_filter".into()));
  }
  Ok(text)
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice {
  message: ChatMessageResp,
  #[serde(default)] finish_reason: Option<String>,
}
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_choice_is_returned() {
    let json = r#"{
      "id": "chatcmpl-123",
      "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"title\": \"T\"}"}, "finish_reason": "stop"}],
      "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
    }"#;
    let body: ChatCompletionResponse = serde_json::from_str(json).unwrap();
    assert_eq!(first_choice_text(body).unwrap(), r#"{"title": "T"}"#);
  }

  #[test]
  fn null_content_is_empty_text() {
    let json = r#"{"choices": [{"message": {"role": "assistant", "content": null}, "finish_reason": "stop"}]}"#;
    let body: ChatCompletionResponse = serde_json::from_str(json).unwrap();
    assert_eq!(first_choice_text(body).unwrap(), "");
  }

  #[test]
  fn filtered_or_missing_choice_is_error() {
    let filtered = r#"{"choices": [{"message": {"content": null}, "finish_reason": "content_filter"}]}"#;
    let body: ChatCompletionResponse = serde_json::from_str(filtered).unwrap();
    assert!(matches!(first_choice_text(body), Err(LlmError::Empty(_))));

    let body: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
    assert!(matches!(first_choice_text(body), Err(LlmError::Empty(_))));
  }
}
