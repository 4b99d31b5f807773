//! Text-generation backends.
//!
//! The rest of the crate only sees `CourseModel`: one prompt in, one completion out.
//! A concrete client is built once at startup and injected through `AppState`.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::{LlmConfig, Provider};

pub mod gemini;
pub mod openai;

pub use gemini::Gemini;
pub use openai::OpenAI;

const USER_AGENT: &str = "coursegen-backend/0.1";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no API key configured for {0}")]
    MissingKey(&'static str),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("empty completion: {0}")]
    Empty(String),
}

/// Opaque text completion. No streaming, no retries.
#[async_trait]
pub trait CourseModel: Send + Sync {
    /// Model identifier for logs.
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Build the configured backend. Returns None (and logs) when the key is missing,
/// so the server still starts and generation answers with a 500.
pub fn from_config(cfg: &LlmConfig) -> Option<Arc<dyn CourseModel>> {
    let Some(api_key) = cfg.api_key.clone() else {
        error!(target: "llm", provider = ?cfg.provider, "API key not set; course generation will fail");
        return None;
    };

    let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
    if let Some(secs) = cfg.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    let client = match builder.build() {
        Ok(c) => c,
        Err(e) => {
            error!(target: "llm", error = %e, "Failed to build HTTP client");
            return None;
        }
    };

    info!(target: "llm", provider = ?cfg.provider, model = %cfg.model, base_url = %cfg.base_url, timeout_secs = ?cfg.timeout_secs, "Model client ready");
    let model: Arc<dyn CourseModel> = match cfg.provider {
        Provider::Gemini => Arc::new(Gemini { client, api_key, base_url: cfg.base_url.clone(), model: cfg.model.clone() }),
        Provider::OpenAI => Arc::new(OpenAI { client, api_key, base_url: cfg.base_url.clone(), model: cfg.model.clone() }),
    };
    Some(model)
}

/// Both providers wrap failures as `{"error": {"message": ...}}`.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct EWrap { error: EObj }
    #[derive(Deserialize)]
    struct EObj { message: String }
    serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

/// Turn a non-success response into `LlmError::Status`.
pub(crate) async fn status_error(res: reqwest::Response) -> LlmError {
    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    let message = extract_error_message(&body).unwrap_or(body);
    LlmError::Status { status, message }
}
