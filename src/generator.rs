//! Course generation: prompt building, the single model call, and interpretation of
//! the model's text (fence stripping, JSON parse, shape check, degradation).
//!
//! Shared by both generation routes; the route only decides the default shape.

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::config::{ParseFailurePolicy, Policy, Prompts, SchemaPolicy};
use crate::domain::{CourseRequest, CourseShape};
use crate::error::AppError;
use crate::llm::LlmError;
use crate::state::AppState;
use crate::util::{fill_template, strip_code_fences, trunc_for_log};

pub const FALLBACK_TITLE: &str = "Generated Course";
const EMPTY_OUTPUT_DESCRIPTION: &str = "The model returned no content.";

/// How much of the returned course we could vouch for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CourseStatus {
  /// Parsed and (unless checking is off) matched the expected shape.
  Structured,
  /// Not JSON; raw text placed in `description`.
  Degraded,
  /// Parsed but did not match the expected shape; passed through as-is.
  Unchecked,
}

impl CourseStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      CourseStatus::Structured => "structured",
      CourseStatus::Degraded => "degraded",
      CourseStatus::Unchecked => "unchecked",
    }
  }
}

#[derive(Debug)]
pub struct Generated {
  pub course: Value,
  pub status: CourseStatus,
}

/// Fill the shape's template with every request field.
pub fn build_prompt(prompts: &Prompts, shape: CourseShape, req: &CourseRequest) -> String {
  let details = req.details();
  fill_template(
    prompts.template_for(shape),
    &[
      ("topic", &req.topic),
      ("language", &req.language),
      ("tone", &req.tone),
      ("difficulty", &req.difficulty),
      ("details", &details),
    ],
  )
}

/// `{title: "Generated Course", description: <text>, <shape key>: []}`.
/// The description is never empty.
pub fn degraded_course(shape: CourseShape, text: &str) -> Value {
  let description = if text.trim().is_empty() { EMPTY_OUTPUT_DESCRIPTION } else { text };
  let mut obj = Map::new();
  obj.insert("title".into(), json!(FALLBACK_TITLE));
  obj.insert("description".into(), json!(description));
  obj.insert(shape.key().into(), json!([]));
  Value::Object(obj)
}

/// Required keys: `title` and `description` as strings, the shape key as an array.
pub fn check_shape(value: &Value, shape: CourseShape) -> Result<(), String> {
  let Some(obj) = value.as_object() else {
    return Err("top-level value is not an object".into());
  };
  for key in ["title", "description"] {
    if !obj.get(key).is_some_and(Value::is_string) {
      return Err(format!("`{}` missing or not a string", key));
    }
  }
  if !obj.get(shape.key()).is_some_and(Value::is_array) {
    return Err(format!("`{}` missing or not an array", shape.key()));
  }
  Ok(())
}

/// Turn the raw completion into the response body according to the policies.
pub fn interpret(raw: &str, shape: CourseShape, policy: &Policy) -> Result<Generated, AppError> {
  let text = strip_code_fences(raw);

  let parsed = match serde_json::from_str::<Value>(&text) {
    Ok(v) => v,
    Err(e) => {
      warn!(target: "generation", error = %e, preview = %trunc_for_log(&text, 80), "Model output is not JSON");
      return match policy.on_parse_failure {
        ParseFailurePolicy::Degrade => Ok(Generated { course: degraded_course(shape, &text), status: CourseStatus::Degraded }),
        ParseFailurePolicy::Reject => Err(AppError::Malformed(format!("not JSON: {}", e))),
      };
    }
  };

  if policy.schema == SchemaPolicy::Off {
    return Ok(Generated { course: parsed, status: CourseStatus::Structured });
  }
  match check_shape(&parsed, shape) {
    Ok(()) => Ok(Generated { course: parsed, status: CourseStatus::Structured }),
    Err(reason) => match policy.schema {
      SchemaPolicy::Reject => Err(AppError::Malformed(reason)),
      _ => {
        warn!(target: "generation", shape = shape.key(), %reason, "Model JSON does not match expected shape; passing through");
        Ok(Generated { course: parsed, status: CourseStatus::Unchecked })
      }
    },
  }
}

/// One request, one model call.
#[instrument(level = "info", target = "generation", skip(state, shape, req),
             fields(generation_id = %Uuid::new_v4(), shape = shape.key(), topic_len = req.topic.len()))]
pub async fn generate_course(state: &AppState, shape: CourseShape, req: &CourseRequest) -> Result<Generated, AppError> {
  let model = state.model.as_ref().ok_or(LlmError::MissingKey("model backend"))?;

  let prompt = build_prompt(&state.config.prompts, shape, req);
  debug!(target: "generation", model = model.name(), prompt_len = prompt.len(), "Prompt built");

  let raw = model.complete(&prompt).await?;
  let generated = interpret(&raw, shape, &state.config.policy)?;
  info!(target: "generation", status = generated.status.as_str(), response_len = raw.len(), "Course generated");
  Ok(generated)
}
