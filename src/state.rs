//! Application state: loaded configuration and the injected model client.
//!
//! Built once at startup and shared read-only through `Arc`; nothing in here is mutated
//! while serving requests.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::{load_app_config_from_env, AppConfig, LlmConfig};
use crate::llm::{self, CourseModel};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// None when no API key was configured; generation then fails with a 500.
    pub model: Option<Arc<dyn CourseModel>>,
}

impl AppState {
    /// Build state from env: TOML config (or defaults) and the model client.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let config = load_app_config_from_env().unwrap_or_default();
        let model = llm::from_config(&LlmConfig::from_env());
        info!(
            target: "coursegen_backend",
            model = model.as_ref().map(|m| m.name()).unwrap_or("none"),
            generate_course_shape = config.shapes.generate_course.key(),
            api_generate_course_shape = config.shapes.api_generate_course.key(),
            on_parse_failure = ?config.policy.on_parse_failure,
            schema_policy = ?config.policy.schema,
            "Application state ready"
        );
        Self::new(config, model)
    }

    pub fn new(config: AppConfig, model: Option<Arc<dyn CourseModel>>) -> Self {
        Self { config, model }
    }
}
