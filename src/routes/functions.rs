//! Simulated helper functions (coach, translation, export, template course).
//! Malformed bodies answer 400 `{"error": ...}`.

use std::sync::Arc;

use axum::{
  extract::{rejection::JsonRejection, State},
  http::header::CONTENT_DISPOSITION,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::domain::{normalize, CourseRequestIn};
use crate::error::AppError;
use crate::protocol::*;
use crate::simulate::{self, simulated_delay};
use crate::state::AppState;

fn body<T>(b: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
  b.map(|Json(v)| v).map_err(|e| AppError::BadRequest(e.body_text()))
}

fn attachment<T: serde::Serialize>(filename: String, doc: T) -> Response {
  let disposition = format!("attachment; filename=\"{}\"", filename);
  ([(CONTENT_DISPOSITION, disposition)], Json(doc)).into_response()
}

#[instrument(level = "info", skip_all)]
pub async fn fn_generate_course(b: Result<Json<CourseRequestIn>, JsonRejection>) -> Result<Json<TemplateCourse>, AppError> {
  let (req, _) = normalize(body(b)?)?;
  Ok(Json(simulate::template_course(&req)))
}

#[instrument(level = "info", skip_all)]
pub async fn fn_ai_coach(
  State(state): State<Arc<AppState>>,
  b: Result<Json<CoachIn>, JsonRejection>,
) -> Result<Json<CoachOut>, AppError> {
  let input = body(b)?;
  simulated_delay(state.config.simulation.ai_coach_ms).await;
  let out = simulate::coach_reply(&input);
  info!(target: "simulate", kind = ?out.kind, "Coach reply served");
  Ok(Json(out))
}

#[instrument(level = "info", skip_all)]
pub async fn fn_translate_content(
  State(state): State<Arc<AppState>>,
  b: Result<Json<TranslateIn>, JsonRejection>,
) -> Result<Json<TranslateOut>, AppError> {
  let input = body(b)?;
  simulated_delay(state.config.simulation.translate_ms).await;
  Ok(Json(simulate::translate(input)))
}

#[instrument(level = "info", skip_all)]
pub async fn fn_export_pdf(
  State(state): State<Arc<AppState>>,
  b: Result<Json<ExportPdfIn>, JsonRejection>,
) -> Result<Response, AppError> {
  let input = body(b)?;
  simulated_delay(state.config.simulation.export_pdf_ms).await;
  let filename = simulate::export_filename(&input.course_id, "pdf");
  info!(target: "simulate", %filename, lessons = input.lessons.len(), "PDF export served");
  Ok(attachment(filename, simulate::pdf_document(input)))
}

#[instrument(level = "info", skip_all)]
pub async fn fn_export_ppt(
  State(state): State<Arc<AppState>>,
  b: Result<Json<ExportPptIn>, JsonRejection>,
) -> Result<Response, AppError> {
  let input = body(b)?;
  simulated_delay(state.config.simulation.export_ppt_ms).await;
  let filename = simulate::export_filename(&input.course_id, "pptx");
  info!(target: "simulate", %filename, lessons = input.lessons.len(), "Slide export served");
  Ok(attachment(filename, simulate::slide_deck(input.lessons)))
}
