//! Log setup for the course backend.
//!
//! Targets used across the crate:
//! - `generation`: request normalization, prompt building, parse/degrade outcome
//! - `llm`: provider calls with latency and token usage (never prompts or keys)
//! - `simulate`: the canned helper functions and their artificial delays
//!
//! `LOG_LEVEL` overrides the filter (e.g. "info,llm=debug"). `LOG_FORMAT=json` switches
//! to one JSON object per line; anything else gives the human-readable format.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "info,generation=debug,llm=info,simulate=debug,coursegen_backend=debug,tower_http=info";

#[derive(Debug, PartialEq, Eq)]
enum LogFormat {
    Pretty,
    Json,
}

fn log_format(value: Option<&str>) -> LogFormat {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Pretty,
    }
}

fn filter_from(value: Option<&str>) -> EnvFilter {
    value
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

pub fn init_tracing() {
    let level = std::env::var("LOG_LEVEL").ok();
    let format = std::env::var("LOG_FORMAT").ok();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter_from(level.as_deref()))
        .with_target(true)
        .with_line_number(true);

    match log_format(format.as_deref()) {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}
