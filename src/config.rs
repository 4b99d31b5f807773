//! Configuration: an optional TOML file (prompts, shapes, policies, simulated delays)
//! plus environment variables for the server and the model backend.
//!
//! See `AppConfig` and `LlmConfig` for the expected schema.

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::CourseShape;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {path}: {source}")]
  Read { path: String, source: std::io::Error },
  #[error("failed to parse TOML: {0}")]
  Parse(#[from] toml::de::Error),
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
  pub prompts: Prompts,
  pub shapes: RouteShapes,
  pub policy: Policy,
  pub simulation: SimulationDelays,
}

impl AppConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(s)?)
  }

  pub fn load(path: &str) -> Result<Self, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.to_string(), source })?;
    Self::from_toml_str(&s)
  }
}

/// Prompt templates, one per course shape. Placeholders: {topic}, {language},
/// {tone}, {difficulty}, {details}.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub outline_template: String,
  pub chapters_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      outline_template: "Generate a course in **valid JSON only** with keys: title, description, outline.\n\
Each outline item must have: module (number), title, description, topics (array of strings), estimated_time.\n\
Topic: \"{topic}\".\n\
Language: {language}, Tone: {tone}, Difficulty: {difficulty}.\n\
{details}\n\
Return valid JSON only.".into(),
      chapters_template: "Generate a complete course in **valid JSON only** with these keys:\n\n\
\"title\": string,\n\
\"description\": string,\n\
\"chapters\": array of objects, each with:\n  \
\"title\": string,\n  \
\"content\": several paragraphs of detailed explanation (book style),\n  \
\"quiz\": array of 5 multiple-choice questions (each has \"question\", \"options\", \"answer\"),\n  \
\"questions_bank\": array of 5 open-ended practice questions.\n\n\
Topic: {topic}.\n\
Language: {language}.\n\
Tone: {tone}.\n\
Difficulty: {difficulty}.\n\
{details}\n\n\
Return valid JSON only, no markdown fences.".into(),
    }
  }
}

impl Prompts {
  pub fn template_for(&self, shape: CourseShape) -> &str {
    match shape {
      CourseShape::Outline => &self.outline_template,
      CourseShape::Chapters => &self.chapters_template,
    }
  }
}

/// Shape used by each generation route when the body does not pick one.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RouteShapes {
  /// `POST /generate-course`
  pub generate_course: CourseShape,
  /// `POST /api/generate-course`
  pub api_generate_course: CourseShape,
}

impl Default for RouteShapes {
  fn default() -> Self {
    Self { generate_course: CourseShape::Chapters, api_generate_course: CourseShape::Outline }
  }
}

/// What to do when the model's text is not JSON.
#[derive(Clone, Copy, Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParseFailurePolicy {
  /// Answer 200 with a degraded course carrying the raw text.
  #[default]
  Degrade,
  /// Answer 502.
  Reject,
}

/// What to do when the JSON parses but lacks title/description/shape key.
#[derive(Clone, Copy, Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchemaPolicy {
  /// Pass through unchanged, marked `unchecked`.
  #[default]
  Flag,
  Reject,
  Off,
}

#[derive(Clone, Debug, Deserialize, Default)]
#[serde(default)]
pub struct Policy {
  pub on_parse_failure: ParseFailurePolicy,
  pub schema: SchemaPolicy,
}

/// Artificial latency of the simulated functions, in milliseconds.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct SimulationDelays {
  pub ai_coach_ms: u64,
  pub translate_ms: u64,
  pub export_pdf_ms: u64,
  pub export_ppt_ms: u64,
}

impl Default for SimulationDelays {
  fn default() -> Self {
    Self { ai_coach_ms: 1500, translate_ms: 1000, export_pdf_ms: 1500, export_ppt_ms: 2000 }
  }
}

impl SimulationDelays {
  pub fn none() -> Self {
    Self { ai_coach_ms: 0, translate_ms: 0, export_pdf_ms: 0, export_ppt_ms: 0 }
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
  Gemini,
  OpenAI,
}

/// Model backend settings. Secrets only ever come from the environment.
#[derive(Clone, Debug)]
pub struct LlmConfig {
  pub provider: Provider,
  pub api_key: Option<String>,
  pub model: String,
  pub base_url: String,
  pub timeout_secs: Option<u64>,
}

impl Default for LlmConfig {
  fn default() -> Self {
    Self {
      provider: Provider::Gemini,
      api_key: None,
      model: "gemini-2.0-flash".into(),
      base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
      timeout_secs: None,
    }
  }
}

fn env_or(key: &str, default: &str) -> String {
  std::env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_string())
}

impl LlmConfig {
  /// LLM_PROVIDER, GEMINI_* / OPENAI_*, LLM_TIMEOUT_SECS.
  pub fn from_env() -> Self {
    let provider = match std::env::var("LLM_PROVIDER").ok().map(|p| p.to_ascii_lowercase()).as_deref() {
      None | Some("") | Some("gemini") => Provider::Gemini,
      Some("openai") => Provider::OpenAI,
      Some(other) => {
        warn!(target: "coursegen_backend", provider = %other, "Unknown LLM_PROVIDER; using gemini");
        Provider::Gemini
      }
    };
    let timeout_secs = std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|s| s.parse::<u64>().ok());

    match provider {
      Provider::Gemini => {
        let d = Self::default();
        Self {
          provider,
          api_key: std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
          model: env_or("GEMINI_MODEL", &d.model),
          base_url: env_or("GEMINI_BASE_URL", &d.base_url),
          timeout_secs,
        }
      }
      Provider::OpenAI => Self {
        provider,
        api_key: std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()),
        model: env_or("OPENAI_MODEL", "gpt-4o-mini"),
        base_url: env_or("OPENAI_BASE_URL", "https://api.openai.com/v1"),
        timeout_secs,
      },
    }
  }
}

/// Listener and static frontend settings.
#[derive(Clone, Debug)]
pub struct ServerConfig {
  pub port: u16,
  pub static_dir: PathBuf,
}

impl ServerConfig {
  pub fn from_env() -> Self {
    let port = std::env::var("PORT").ok().and_then(|p| p.parse::<u16>().ok()).unwrap_or(5000);
    let static_dir = PathBuf::from(env_or("STATIC_DIR", "./static"));
    Self { port, static_dir }
  }
}

/// Load `AppConfig` from COURSE_CONFIG_PATH. On any IO/parse error, returns None.
pub fn load_app_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("COURSE_CONFIG_PATH").ok()?;
  match AppConfig::load(&path) {
    Ok(cfg) => {
      info!(target: "coursegen_backend", %path, "Loaded app config (TOML)");
      Some(cfg)
    }
    Err(e) => {
      error!(target: "coursegen_backend", %path, error = %e, "Failed to load TOML config; using defaults");
      None
    }
  }
}
