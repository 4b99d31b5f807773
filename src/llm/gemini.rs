//! Google Generative Language API client (`models/{model}:generateContent`).
//!
//! We never log the API key. It travels in the `x-goog-api-key` header, not the URL.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{status_error, CourseModel, LlmError};

#[derive(Clone)]
pub struct Gemini {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

#[async_trait]
impl CourseModel for Gemini {
  fn name(&self) -> &str { &self.model }

  #[instrument(level = "info", target = "llm", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
    let url = format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model);
    let req = GenerateContentRequest {
      contents: vec![Content { role: "user".into(), parts: vec![Part { text: prompt.into() }] }],
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(CONTENT_TYPE, "application/json")
      .header("x-goog-api-key", &self.api_key)
      .json(&req).send().await?;

    if !res.status().is_success() {
      return Err(status_error(res).await);
    }

    let body: GenerateContentResponse = res.json().await?;
    if let Some(usage) = &body.usage_metadata {
      info!(target: "llm", prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }
    let text = extract_text(body)?;
    info!(target: "llm", elapsed = ?start.elapsed(), response_len = text.len(), "Gemini response received");
    Ok(text)
  }
}

/// Finish reasons that mean the content was withheld rather than simply empty.
const BLOCKING_FINISH_REASONS: [&str; 5] = ["SAFETY", "RECITATION", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

/// Concatenate the text parts of the first candidate.
/// Withheld content (blocked prompt, safety-style finish reason) is an error; a normally
/// finished but empty candidate yields an empty string.
fn extract_text(body: GenerateContentResponse) -> Result<String, LlmError> {
  if let Some(feedback) = body.prompt_feedback.and_then(|f| f.block_reason) {
    return Err(LlmError::Empty(format!("prompt blocked: {}", feedback)));
  }
  let Some(first) = body.candidates.into_iter().next() else {
    return Err(LlmError::Empty("no candidates".into()));
  };
  let text: String = first.content
    .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
    .unwrap_or_default();
  if text.is_empty() {
    if let Some(reason) = first.finish_reason.filter(|r| BLOCKING_FINISH_REASONS.contains(&r.as_str())) {
      return Err(LlmError::Empty(format!("finish reason {}", reason)));
    }
  }
  Ok(text)
}

// --- DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest { contents: Vec<Content> }
#[derive(Serialize)]
struct Content { role: String, parts: Vec<Part> }
#[derive(Serialize)]
struct Part { text: String }

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] prompt_feedback: Option<PromptFeedback>,
  #[serde(default)] usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
  #[serde(default)] content: Option<CandidateContent>,
  #[serde(default)] finish_reason: Option<String>,
}
#[derive(Deserialize)]
struct CandidateContent { #[serde(default)] parts: Vec<PartResp> }
#[derive(Deserialize)]
struct PartResp { #[serde(default)] text: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback { #[serde(default)] block_reason: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}
