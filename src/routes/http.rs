//! Course generation and health handlers. Thin wrappers that forward to `generator`.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, State},
  http::HeaderName,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::domain::{normalize, CourseRequestIn, CourseShape};
use crate::error::AppError;
use crate::generator::generate_course;
use crate::protocol::HealthOut;
use crate::state::AppState;

/// `structured`, `degraded` or `unchecked`; see `CourseStatus`.
pub const COURSE_STATUS_HEADER: HeaderName = HeaderName::from_static("x-course-status");

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, model: state.model.is_some() })
}

/// `POST /generate-course`
#[instrument(level = "info", skip_all)]
pub async fn http_generate_course(
  State(state): State<Arc<AppState>>,
  body: Result<Json<CourseRequestIn>, JsonRejection>,
) -> Result<Response, AppError> {
  let shape = state.config.shapes.generate_course;
  generate(&state, shape, body).await
}

/// `POST /api/generate-course`
#[instrument(level = "info", skip_all)]
pub async fn http_api_generate_course(
  State(state): State<Arc<AppState>>,
  body: Result<Json<CourseRequestIn>, JsonRejection>,
) -> Result<Response, AppError> {
  let shape = state.config.shapes.api_generate_course;
  generate(&state, shape, body).await
}

async fn generate(
  state: &AppState,
  route_shape: CourseShape,
  body: Result<Json<CourseRequestIn>, JsonRejection>,
) -> Result<Response, AppError> {
  let Json(raw) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
  let (req, requested) = normalize(raw)?;
  let shape = requested.unwrap_or(route_shape);

  let generated = generate_course(state, shape, &req).await?;
  info!(target: "generation", shape = shape.key(), status = generated.status.as_str(), "HTTP course served");
  Ok(([(COURSE_STATUS_HEADER, generated.status.as_str())], Json(generated.course)).into_response())
}
