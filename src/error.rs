//! Error types and their HTTP mapping.
//!
//! Callers only ever see the generic messages below. Upstream causes are logged here.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

use crate::llm::LlmError;
use crate::protocol::ErrorOut;

pub const GENERATION_FAILED: &str = "Failed to generate course";
pub const UNUSABLE_COURSE: &str = "Model returned an unusable course";

/// Input rejected before any model call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing {0}")]
    MissingField(&'static str),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("model call failed: {0}")]
    Upstream(#[from] LlmError),

    /// Only produced under the strict parse/shape policies.
    #[error("model output rejected: {0}")]
    Malformed(String),

    /// Malformed body on the simulated functions.
    #[error("{0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            AppError::Upstream(e) => {
                error!(target: "generation", error = %e, "Error generating course");
                (StatusCode::INTERNAL_SERVER_ERROR, GENERATION_FAILED.to_string())
            }
            AppError::Malformed(reason) => {
                warn!(target: "generation", %reason, "Rejected model output");
                (StatusCode::BAD_GATEWAY, UNUSABLE_COURSE.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };
        (status, Json(ErrorOut { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use axum::body::to_bytes;

    use super::*;

    /// Log sink shared between the subscriber and the test.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn upstream_detail_is_logged_not_exposed() {
        let logs = Captured::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let err = AppError::Upstream(LlmError::Status { status: 401, message: "API key sk-secret invalid".into() });
        let resp = tracing::subscriber::with_default(subscriber, || err.into_response());
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], br#"{"error":"Failed to generate course"}"#);
        assert!(!String::from_utf8_lossy(&body).contains("sk-secret"));

        let logged = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(logged.contains("Error generating course"), "log was: {}", logged);
        assert!(logged.contains("HTTP 401: API key sk-secret invalid"), "log was: {}", logged);
    }

    #[test]
    fn status_codes() {
        let v = AppError::from(ValidationError::MissingField("topic")).into_response();
        assert_eq!(v.status(), StatusCode::BAD_REQUEST);
        let m = AppError::Malformed("no title".into()).into_response();
        assert_eq!(m.status(), StatusCode::BAD_GATEWAY);
    }
}
