//! Course generation backend
//!
//! - Axum HTTP API: AI course generation + simulated helper functions
//! - Gemini (default) or OpenAI-compatible model backend, selected via env
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                : u16 (default 5000)
//!   LLM_PROVIDER        : "gemini" (default) or "openai"
//!   GEMINI_API_KEY      : key for the Generative Language API
//!   GEMINI_MODEL        : default "gemini-2.0-flash"
//!   OPENAI_API_KEY      : key when LLM_PROVIDER=openai
//!   LLM_TIMEOUT_SECS    : optional client timeout
//!   COURSE_CONFIG_PATH  : path to TOML config (prompts, shapes, policies, delays)
//!   STATIC_DIR          : frontend build directory (default ./static)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"

mod config;
mod domain;
mod error;
mod generator;
mod llm;
mod protocol;
mod routes;
mod simulate;
mod state;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::ServerConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let server = ServerConfig::from_env();
  // Model client is constructed once here and injected into every handler.
  let state = Arc::new(AppState::from_env());
  let app = build_router(state, &server.static_dir);

  let addr = SocketAddr::from(([0, 0, 0, 0], server.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "coursegen_backend", %addr, static_dir = %server.static_dir.display(), "HTTP server listening");
  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
  info!(target: "coursegen_backend", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(target: "coursegen_backend", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
  info!(target: "coursegen_backend", "Shutdown signal received");
}
